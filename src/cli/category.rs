//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::TrafficResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
    },

    /// Delete a category that no record uses
    #[command(alias = "rm")]
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> TrafficResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list_categories()?;
            let counts = categories
                .iter()
                .map(|c| storage.records.count_by_category(&c.id))
                .collect::<TrafficResult<Vec<_>>>()?;
            print!("{}", format_category_list(&categories, &counts));
        }

        CategoryCommands::Add { name } => {
            let category = service.add_category(&name)?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Delete { category } => {
            let cat = service.require_category(&category)?;
            service.delete_category(&cat.id)?;
            println!("Deleted category: {}", cat.name);
        }
    }

    Ok(())
}
