use crate::cli::{Cli, DatasetsSubcommand, OutputFormat};
use crate::error::{CliResult, IntoCliResult};
use crate::exit_codes::EXIT_SUCCESS;
use crate::runtime::Tools;
use colored::*;
use notegate::capabilities::check_compatibility;
use notegate::datasets::format_modalities;
use notegate::DatasetDefinition;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
struct DatasetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Modalities")]
    modalities: String,
    #[tabled(rename = "Database")]
    database: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(serde::Serialize)]
struct DatasetInfo {
    name: String,
    active: bool,
    modalities: Vec<String>,
    database: String,
    database_exists: bool,
    description: String,
}

impl DatasetInfo {
    fn new(dataset: &DatasetDefinition, active: &str) -> Self {
        Self {
            name: dataset.name.clone(),
            active: dataset.name == active,
            modalities: dataset
                .modalities
                .iter()
                .map(|modality| modality.to_string())
                .collect(),
            database: dataset.database.display().to_string(),
            database_exists: dataset.database_exists(),
            description: dataset.description.clone(),
        }
    }
}

pub fn run_datasets_command(tools: &Tools, subcommand: DatasetsSubcommand) -> CliResult<i32> {
    match subcommand {
        DatasetsSubcommand::List { format } => list_datasets(tools, format),
        DatasetsSubcommand::Tools => {
            println!("{}", tool_matrix(tools));
            Ok(EXIT_SUCCESS)
        }
    }
}

fn list_datasets(tools: &Tools, format: OutputFormat) -> CliResult<i32> {
    let registry = &tools.context.datasets;
    let active = registry.active_name();
    let infos: Vec<DatasetInfo> = registry
        .list()
        .iter()
        .map(|dataset| DatasetInfo::new(dataset, &active))
        .collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&infos).cli_critical_error()?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let color = Cli::should_use_color();
            let rows: Vec<DatasetRow> = infos.iter().map(|info| dataset_row(info, color)).collect();

            let mut table = Table::new(rows);
            table.with(Style::modern());
            println!("{table}");
            println!("\nActive dataset: {}", if color { active.bold().to_string() } else { active });
        }
    }

    Ok(EXIT_SUCCESS)
}

fn dataset_row(info: &DatasetInfo, color: bool) -> DatasetRow {
    let name = if info.active {
        format!("{} *", info.name)
    } else {
        info.name.clone()
    };
    let database = match (info.database_exists, color) {
        (true, true) => "available".green().to_string(),
        (true, false) => "available".to_string(),
        (false, true) => "missing".red().to_string(),
        (false, false) => "missing".to_string(),
    };

    DatasetRow {
        name,
        modalities: info.modalities.join(", "),
        database,
        description: info.description.clone(),
    }
}

/// One row per tool, one column per dataset
fn tool_matrix(tools: &Tools) -> String {
    let datasets = tools.context.datasets.list();
    let descriptors = tools.registry.descriptors();

    let mut builder = Builder::default();
    let mut header = vec!["Tool".to_string(), "Requires".to_string()];
    header.extend(datasets.iter().map(|dataset| dataset.name.clone()));
    builder.push_record(header);

    for descriptor in &descriptors {
        let requires = if descriptor.required_modalities.is_empty() {
            "-".to_string()
        } else {
            format_modalities(&descriptor.required_modalities)
        };
        let mut record = vec![descriptor.name.clone(), requires];
        record.extend(datasets.iter().map(|dataset| {
            if check_compatibility(descriptor, dataset).is_compatible() {
                "yes".to_string()
            } else {
                "no".to_string()
            }
        }));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}
