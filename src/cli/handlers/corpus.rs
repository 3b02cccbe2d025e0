//! Scholar, category, and subcategory command handlers.

use anyhow::{Context, Result, bail};

use super::Vault;
use crate::cli::output::{Output, OutputFormat};
use crate::cli::{CategoryCommand, ScholarCommand, SubcategoryCommand};
use crate::domain::Scholar;
use crate::store::CorpusRepository;

/// Finds a scholar by id, or else by case-insensitive name.
pub fn find_scholar<R: CorpusRepository>(store: &R, identifier: &str) -> Result<Scholar> {
    let identifier = identifier.trim();
    if let Some(scholar) = store.get_scholar(identifier)? {
        return Ok(scholar);
    }

    let wanted = identifier.to_lowercase();
    let mut matches: Vec<Scholar> = store
        .list_scholars()?
        .into_iter()
        .filter(|s| s.name.to_lowercase() == wanted)
        .collect();
    match matches.len() {
        0 => bail!("scholar not found: '{}'", identifier),
        1 => Ok(matches.remove(0)),
        _ => {
            let ids: Vec<&str> = matches.iter().map(|s| s.id.as_str()).collect();
            bail!(
                "ambiguous scholar '{}': use one of the ids {}",
                identifier,
                ids.join(", ")
            )
        }
    }
}

pub fn handle_scholar(command: &ScholarCommand, vault: &mut Vault) -> Result<()> {
    match command {
        ScholarCommand::Add(args) => {
            let scholar = vault
                .store
                .add_scholar(&args.name, args.era.as_deref(), args.madhhab.as_deref())
                .with_context(|| format!("failed to add scholar '{}'", args.name))?;
            println!("Added scholar {} ({})", scholar.name, scholar.id);
        }
        ScholarCommand::Ls(output) => {
            let scholars = vault
                .store
                .list_scholars()
                .with_context(|| "failed to list scholars")?;
            match output.format {
                OutputFormat::Human => {
                    if scholars.is_empty() {
                        println!("No scholars found.");
                    }
                    for s in &scholars {
                        match s.meta() {
                            Some(meta) => println!("{}  ({})  {}", s.name, s.id, meta),
                            None => println!("{}  ({})", s.name, s.id),
                        }
                    }
                }
                OutputFormat::Json => Output::new(&scholars).print()?,
            }
        }
    }
    Ok(())
}

pub fn handle_category(command: &CategoryCommand, vault: &mut Vault) -> Result<()> {
    match command {
        CategoryCommand::Add(args) => {
            let scholar = find_scholar(&vault.store, &args.scholar)?;
            let category = vault
                .store
                .add_category(&scholar.id, &args.name)
                .with_context(|| format!("failed to add category '{}'", args.name))?;
            println!(
                "Added category {} > {} ({})",
                scholar.name, category.name, category.id
            );
        }
        CategoryCommand::Ls(args) => {
            let scholar = find_scholar(&vault.store, &args.scholar)?;
            let categories = vault
                .store
                .list_categories(&scholar.id)
                .with_context(|| "failed to list categories")?;
            match args.output.format {
                OutputFormat::Human => {
                    if categories.is_empty() {
                        println!("No categories for {}.", scholar.name);
                    }
                    for c in &categories {
                        println!("{}  ({})", c.name, c.id);
                    }
                }
                OutputFormat::Json => Output::new(&categories).print()?,
            }
        }
    }
    Ok(())
}

pub fn handle_subcategory(command: &SubcategoryCommand, vault: &mut Vault) -> Result<()> {
    match command {
        SubcategoryCommand::Add(args) => {
            let scholar = find_scholar(&vault.store, &args.scholar)?;
            let subcategory = vault
                .store
                .add_subcategory(&scholar.id, &args.category, &args.name)
                .with_context(|| format!("failed to add subcategory '{}'", args.name))?;
            println!(
                "Added subcategory {} > {} > {} ({})",
                scholar.name, subcategory.category_name, subcategory.name, subcategory.id
            );
        }
        SubcategoryCommand::Ls(args) => {
            let scholar = find_scholar(&vault.store, &args.scholar)?;
            let subcategories = vault
                .store
                .list_subcategories(&scholar.id, &args.category)
                .with_context(|| "failed to list subcategories")?;
            match args.output.format {
                OutputFormat::Human => {
                    if subcategories.is_empty() {
                        println!("No subcategories for {} > {}.", scholar.name, args.category);
                    }
                    for s in &subcategories {
                        println!("{}  ({})", s.name, s.id);
                    }
                }
                OutputFormat::Json => Output::new(&subcategories).print()?,
            }
        }
    }
    Ok(())
}
