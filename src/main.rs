use clap::Parser;
use lead_ingest::core::scorer;
use lead_ingest::utils::{logger, validation::Validate};
use lead_ingest::CliConfig;

fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting lead-ingest CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.merge_config_file() {
        tracing::error!("Failed to load config file: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let options = config.parser_options();
    let report = lead_ingest::process_file(config.input_path(), &options);

    if !report.success {
        for error in &report.errors {
            eprintln!("❌ {}", error);
        }
        std::process::exit(1);
    }

    println!("✅ Processed {}", report.file_path);
    println!(
        "   rows: {} parsed / {} total ({:.1}% success)",
        report.parse_stats.processed_rows,
        report.parse_stats.total_rows,
        report.parse_stats.success_rate
    );
    println!(
        "   leads: {} cleaned, {} duplicates, {} with warnings",
        report.cleaning_stats.cleaned_records,
        report.cleaning_stats.duplicate_records,
        report.cleaning_stats.records_with_warnings
    );
    for warning in &report.cleaning_stats.warnings {
        tracing::warn!("{}", warning);
    }

    if config.score {
        for lead in &report.data {
            let classification = scorer::classify_lead(lead);
            println!(
                "   row {:>4}: score {:>6.2} priority {:?} category {:?}",
                lead.source_file_row,
                classification.lead_score,
                classification.priority,
                classification.category
            );
        }
    }

    if let Some(report_path) = &config.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(report_path, json)?;
        println!("📁 Report saved to: {}", report_path);
    }

    Ok(())
}
