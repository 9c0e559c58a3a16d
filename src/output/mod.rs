use crate::error::Result;
use colored::*;
use comfy_table::Table;
use serde::Serialize;

/// Unified output formatter for all commands
pub struct OutputFormatter {
    color_enabled: bool,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self {
            color_enabled: true,
        }
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color_enabled = enabled;
        self
    }

    /// Format items as a table
    pub fn table<T: TableFormat>(&self, items: &[T]) -> Result<()> {
        println!("{}", render_table(items));
        Ok(())
    }

    /// Format items as JSON
    pub fn json<T: Serialize + ?Sized>(&self, items: &T) -> Result<()> {
        if self.color_enabled {
            crate::utils::print_colored_json(items)?;
        } else {
            let json = serde_json::to_string_pretty(items)?;
            println!("{}", json);
        }
        Ok(())
    }

    /// Format items as plain text
    pub fn plain<T: PlainFormat>(&self, items: &[T]) -> Result<()> {
        for item in items {
            println!("{}", item.plain());
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, msg: &str) -> Result<()> {
        if self.color_enabled {
            println!("{}", msg.bright_green());
        } else {
            println!("{}", msg);
        }
        Ok(())
    }

    /// Print an error message
    pub fn error(&self, msg: &str) -> Result<()> {
        if self.color_enabled {
            eprintln!("{}", msg.bright_red());
        } else {
            eprintln!("ERROR: {}", msg);
        }
        Ok(())
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for types that can be formatted as a table
pub trait TableFormat {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Trait for types that can be formatted as plain text
pub trait PlainFormat {
    fn plain(&self) -> String;
}

pub(crate) fn render_table<T: TableFormat>(items: &[T]) -> Table {
    let mut table = Table::new();
    table.set_header(T::headers());
    table.load_preset(comfy_table::presets::NOTHING);
    for item in items {
        table.add_row(item.row());
    }
    table
}

/// Module for specific formatters
pub mod device;
pub mod file;

pub use device::{DeviceEventRow, DeviceRow};
pub use file::format_size;
