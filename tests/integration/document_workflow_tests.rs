/*!
 * Integration tests for the document translation workflow
 */

use std::fs;
use anyhow::Result;
use l2t::app_config::Config;
use l2t::app_controller::{Controller, RunOptions, RunOutcome};
use l2t::providers::mock::MockProvider;
use crate::common;

/// Load a Latin-1 file with blank lines, translate it, and write UTF-8 output
#[tokio::test]
async fn test_document_workflow_withLatin1File_shouldPreserveLayout() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;

    let mut source = Vec::new();
    source.extend_from_slice(b"Premi\xe8re ligne du document, assez longue pour compter.\n");
    source.extend_from_slice(b"\n");
    source.extend_from_slice(b"Deuxi\xe8me ligne, apr\xe8s une ligne vide dans le texte.\n");
    source.extend_from_slice(b"   \n");
    source.extend_from_slice(b"Troisi\xe8me et derni\xe8re ligne du fichier d'essai.");
    let input = common::create_test_bytes(temp_dir.path(), "lettre.txt", &source)?;

    let provider = MockProvider::working();
    let mut config = common::test_config();
    config.target_language = "en".to_string();
    let controller = Controller::with_service(config, common::mock_service(&provider));

    let outcome = controller.run(RunOptions {
        input: input.to_string_lossy().to_string(),
        ..RunOptions::default()
    }).await?;

    let output = temp_dir.path().join("lettre.eng-Latn.txt");
    assert_eq!(outcome, RunOutcome::Written { path: output.clone(), failed_segments: 0 });

    let written = fs::read_to_string(&output)?;
    let lines: Vec<&str> = written.split('\n').collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "[eng_Latn] Première ligne du document, assez longue pour compter.");
    assert_eq!(lines[1], "");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "[eng_Latn] Troisième et dernière ligne du fichier d'essai.");
    assert_eq!(provider.request_count(), 3);
    Ok(())
}

/// A config file on disk drives segmentation and languages
#[tokio::test]
async fn test_document_workflow_withConfigFile_shouldApplySettings() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "source_language": "en",
            "target_language": "de",
            "chunk_size": 100,
            "segmentation": { "group_short_lines": true, "min_lines": 3, "short_line_chars": 40 },
            "translation": { "common": { "retry_count": 0, "retry_backoff_ms": 0 } }
        }"#,
    )?;
    let config = Config::load_or_create(&config_path)?;
    config.validate()?;

    let body = "Apples\nPears\nPlums\nCherries\n\
        This closing line is long enough to stand on its own.\n\
        So is this second one, which also ends the list.";
    let input = common::create_test_file(temp_dir.path(), "list.md", body)?;

    let provider = MockProvider::working();
    let controller = Controller::with_service(
        config.clone(),
        l2t::TranslationService::with_provider(std::sync::Arc::new(provider.clone()), &config.translation.common),
    );

    controller.run(RunOptions {
        input: input.to_string_lossy().to_string(),
        ..RunOptions::default()
    }).await?;

    let requests = provider.requests();
    let texts: Vec<&str> = requests.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Apples\nPears\nPlums",
            "Cherries",
            "This closing line is long enough to stand on its own.",
            "So is this second one, which also ends the list.",
        ]
    );
    assert!(requests.iter().all(|r| r.source_language.as_deref() == Some("eng_Latn")));
    assert!(requests.iter().all(|r| r.target_language == "deu_Latn"));
    assert!(temp_dir.path().join("list.deu-Latn.md").exists());
    Ok(())
}

/// Intermittent backend failures end up as markers, never as a failed run
#[tokio::test]
async fn test_document_workflow_withFlakyBackend_shouldCompleteWithMarkers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "report.txt", &common::numbered_document(12))?;

    // Every third call fails and retries are disabled
    let provider = MockProvider::intermittent(3);
    let controller = Controller::with_service(common::test_config(), common::mock_service(&provider));

    let outcome = controller.run(RunOptions {
        input: input.to_string_lossy().to_string(),
        ..RunOptions::default()
    }).await?;

    let output = temp_dir.path().join("report.fra-Latn.txt");
    assert_eq!(outcome, RunOutcome::Written { path: output.clone(), failed_segments: 4 });

    let written = fs::read_to_string(&output)?;
    let markers = written.lines().filter(|line| line.starts_with("[ERROR: ")).count();
    assert_eq!(written.lines().count(), 12);
    assert_eq!(markers, 4);
    assert!(temp_dir.path().join("l2t.issues.log").exists());
    Ok(())
}
