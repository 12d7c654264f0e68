use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::services::slug::slugify;

pub fn handle(name: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    output_value(output_format, "slug", &slugify(name))
}
