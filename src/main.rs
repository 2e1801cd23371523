use anyhow::Context;
use clap::Parser;
use mart_config::adapters::write_dataset_config;
use mart_config::config::Command;
use mart_config::core::Named;
use mart_config::utils::logger::{self, LogFormat};
use mart_config::utils::validation::Validate;
use mart_config::{CliConfig, CompositeConfigAdaptor, ConfigAdaptor, ConfigError};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    let format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    if let Err(e) = logger::init_logger(format, config.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("error: {}", e);
        eprintln!("hint: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        if let Some(config_error) = e.downcast_ref::<ConfigError>() {
            eprintln!("hint: {}", config_error.recovery_suggestion());
        }
        std::process::exit(1);
    }
}

async fn run(config: &CliConfig) -> anyhow::Result<()> {
    let adaptor = config.build_adaptor()?;
    tracing::info!("Serving {} sources as '{}'", adaptor.len(), adaptor.name());

    match &config.command {
        Command::Datasets { adaptor: only } => {
            let configs = match only {
                Some(name) => {
                    adaptor
                        .adaptor_by_name(name)
                        .ok_or_else(|| ConfigError::NotFound {
                            kind: "adaptor".to_string(),
                            name: name.clone(),
                        })?
                        .dataset_configs()
                        .await?
                }
                None => adaptor.dataset_configs().await?,
            };
            if config.json {
                let listing: Vec<serde_json::Value> = configs
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "dataset": c.dataset(),
                            "internalName": c.named().internal_name(),
                            "displayName": c.display_name(),
                            "adaptor": c.adaptor_name(),
                            "digest": c.message_digest(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for dataset in &configs {
                    println!(
                        "{}\t{}\t{}\t{}",
                        dataset.dataset(),
                        dataset.named().internal_name(),
                        dataset.display_name(),
                        dataset.adaptor_name().unwrap_or("-")
                    );
                }
            }
        }
        Command::Names {
            dataset,
            internal_name,
            attributes,
        } => {
            let loaded = load(&adaptor, dataset, internal_name).await?;
            let names = if *attributes {
                loaded.attribute_completer_names()
            } else {
                loaded.filter_completer_names()
            };
            if config.json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        Command::Resolve {
            dataset,
            name,
            internal_name,
        } => {
            let loaded = load(&adaptor, dataset, internal_name).await?;
            let filter = loaded.resolve_filter(name).ok_or_else(|| ConfigError::NotFound {
                kind: "filter".to_string(),
                name: name.clone(),
            })?;
            println!("filter\t{}", filter.internal_name());
            println!("field\t{}", filter.field_for(name).unwrap_or("-"));
            println!(
                "tableConstraint\t{}",
                filter.table_constraint_for(name).unwrap_or("-")
            );
            println!("type\t{}", filter.type_for(name).unwrap_or("-"));
            println!("key\t{}", filter.key_for(name).unwrap_or("-"));
            println!("handler\t{}", filter.handler_for(name).unwrap_or("-"));
            if let Some(page) = loaded.page_for_filter(name) {
                println!("page\t{}", page.internal_name());
            }
        }
        Command::Support {
            dataset,
            field,
            table_constraint,
            internal_name,
            attributes,
        } => {
            let loaded = load(&adaptor, dataset, internal_name).await?;
            let found = if *attributes {
                loaded
                    .find_attribute_support(field, table_constraint)
                    .map(|a| a.internal_name().to_string())
            } else {
                loaded.find_filter_support(field, table_constraint).map(|f| {
                    f.internal_name_by_field_table(field, table_constraint)
                        .unwrap_or_else(|| f.internal_name().to_string())
                })
            };
            match found {
                Some(name) => println!("{}", name),
                None => anyhow::bail!(ConfigError::NotFound {
                    kind: "support".to_string(),
                    name: format!("{}/{}", field, table_constraint),
                }),
            }
        }
        Command::Values {
            dataset,
            name,
            internal_name,
        } => {
            let loaded = load(&adaptor, dataset, internal_name).await?;
            for value in loaded.filter_completer_values(name) {
                println!("value\t{}", value);
            }
            for qualifier in loaded.filter_completer_qualifiers(name) {
                println!("qualifier\t{}", qualifier);
            }
        }
        Command::Dump {
            dataset,
            internal_name,
        } => {
            let loaded = load(&adaptor, dataset, internal_name).await?;
            println!("{}", write_dataset_config(&loaded)?);
        }
    }
    Ok(())
}

async fn load(
    adaptor: &CompositeConfigAdaptor,
    dataset: &str,
    internal_name: &str,
) -> anyhow::Result<mart_config::DatasetConfig> {
    adaptor
        .load_dataset_config(dataset, internal_name)
        .await
        .with_context(|| format!("loading {}/{}", dataset, internal_name))
}
