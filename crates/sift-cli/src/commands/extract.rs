//! Extract command implementation.

use crate::cli::{ExtractArgs, ExtractKind, Preset};
use crate::config::Config;
use crate::error::Result;
use crate::ingest::load_text;
use crate::output::Formatter;
use sift_domain::{Extractable, GeneratorClient};
use sift_extractor::records::{JobProfile, ResumeContents};
use sift_extractor::{CancellationToken, ExtractorConfig, Workflow};
use sift_llm::{build_generator, ConcurrencyGate};
use std::sync::Arc;
use tracing::warn;

/// Execute the extract command.
///
/// Returns whether a record was printed.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<bool> {
    let text = load_text(&args.file)?;

    let limits = extraction_limits(&args, config);

    let gate = ConcurrencyGate::new(config.generator.max_concurrency);
    let generator = build_generator(&config.generator, Some(gate.clone()))?;
    let reviewer = match &config.reflector {
        Some(reflector) => {
            // Same server, same capacity pool
            let shared = (reflector.resolved_endpoint() == config.generator.resolved_endpoint()).then(|| gate.clone());
            Some(build_generator(reflector, shared)?)
        }
        None => None,
    };

    let rendered = match args.kind {
        ExtractKind::Resume => {
            run_workflow::<ResumeContents>(generator, reviewer, limits, &text, args.show_log, formatter).await?
        }
        ExtractKind::Job => {
            run_workflow::<JobProfile>(generator, reviewer, limits, &text, args.show_log, formatter).await?
        }
    };

    match rendered {
        Some(record) => {
            println!("{}", record);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Limits for this run: preset or configured section, then flag overrides.
pub fn extraction_limits(args: &ExtractArgs, config: &Config) -> ExtractorConfig {
    let limits = match args.preset {
        Some(Preset::Aggressive) => ExtractorConfig::aggressive(),
        Some(Preset::Lenient) => ExtractorConfig::lenient(),
        None => config.extractor.clone(),
    };
    match args.max_attempts {
        Some(max_attempts) => limits.with_max_attempts(max_attempts),
        None => limits,
    }
}

/// Run one extraction and render its record, if any.
///
/// Status goes to stderr; Ctrl-C cancels the run at the next opportunity.
pub async fn run_workflow<T: Extractable>(
    generator: Arc<dyn GeneratorClient>,
    reviewer: Option<Arc<dyn GeneratorClient>>,
    limits: ExtractorConfig,
    text: &str,
    show_log: bool,
    formatter: &Formatter,
) -> Result<Option<String>> {
    let mut workflow = Workflow::<T>::new(generator, limits)?;
    if let Some(reviewer) = reviewer {
        workflow = workflow.with_reflector(reviewer);
    }

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping extraction");
                cancel.cancel();
            }
        })
    };

    let report = workflow.run_with_cancel(text, &cancel).await;
    interrupt.abort();
    let report = report?;

    if show_log {
        eprintln!("{}", formatter.message_log(&report.log));
    }
    eprintln!("{}", formatter.run_status(&report));

    report.object().map(|record| formatter.record(record)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliFormat;
    use crate::error::CliError;
    use std::path::PathBuf;
    use sift_extractor::ExtractorError;
    use sift_llm::MockGenerator;

    const PERFECT: &str = r#"{"review": "ok", "recommendations": "none", "feedback": "perfect"}"#;

    fn formatter() -> Formatter {
        Formatter::new(CliFormat::Json, false)
    }

    fn args(preset: Option<Preset>, max_attempts: Option<u32>) -> ExtractArgs {
        ExtractArgs {
            file: PathBuf::from("job.txt"),
            kind: ExtractKind::Job,
            preset,
            max_attempts,
            show_log: false,
            format: CliFormat::Json,
        }
    }

    #[test]
    fn test_limits_follow_config_without_preset() {
        let mut config = Config::default();
        config.extractor.call_timeout_secs = 90;

        let limits = extraction_limits(&args(None, None), &config);
        assert_eq!(limits, config.extractor);
    }

    #[test]
    fn test_preset_replaces_configured_limits() {
        let mut config = Config::default();
        config.extractor.call_timeout_secs = 90;

        assert_eq!(
            extraction_limits(&args(Some(Preset::Aggressive), None), &config),
            ExtractorConfig::aggressive()
        );
        assert_eq!(
            extraction_limits(&args(Some(Preset::Lenient), None), &config),
            ExtractorConfig::lenient()
        );
    }

    #[test]
    fn test_max_attempts_flag_overrides_preset() {
        let limits = extraction_limits(&args(Some(Preset::Lenient), Some(2)), &Config::default());
        assert_eq!(limits.max_attempts, 2);
        assert_eq!(limits.call_timeout_secs, ExtractorConfig::lenient().call_timeout_secs);
    }

    #[tokio::test]
    async fn test_job_profile_rendered() {
        let mock = MockGenerator::scripted([
            r#"```json
{"jobtitle": {"jobtitle": "Data Engineer"}, "clearance_requirement": {"clearance": "Secret"}}
```"#,
            PERFECT,
        ]);

        let rendered = run_workflow::<JobProfile>(
            Arc::new(mock.clone()),
            None,
            ExtractorConfig::default(),
            "Data Engineer, Secret clearance required",
            true,
            &formatter(),
        )
        .await
        .unwrap()
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["jobtitle"]["jobtitle"], "Data Engineer");
        assert_eq!(value["clearance_requirement"]["clearance"], "Secret");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_no_result_renders_nothing() {
        let mock = MockGenerator::new("I can't help with that.");

        let rendered = run_workflow::<ResumeContents>(
            Arc::new(mock),
            None,
            ExtractorConfig::default().with_max_attempts(2),
            "Jane Doe",
            false,
            &formatter(),
        )
        .await
        .unwrap();

        assert!(rendered.is_none());
    }

    #[tokio::test]
    async fn test_separate_reviewer_is_used() {
        let generator = MockGenerator::new("{}");
        let reviewer = MockGenerator::new(PERFECT);

        let rendered = run_workflow::<JobProfile>(
            Arc::new(generator.clone()),
            Some(Arc::new(reviewer.clone())),
            ExtractorConfig::default(),
            "A job",
            false,
            &formatter(),
        )
        .await
        .unwrap();

        assert!(rendered.is_some());
        assert_eq!(generator.call_count(), 1);
        assert_eq!(reviewer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_text_too_long_is_an_error() {
        let limits = ExtractorConfig {
            max_text_length: 5,
            ..ExtractorConfig::default()
        };
        let err = run_workflow::<JobProfile>(
            Arc::new(MockGenerator::new("{}")),
            None,
            limits,
            "far too long",
            false,
            &formatter(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Extractor(ExtractorError::TextTooLong(12, 5))));
    }
}
