//! Skill listing for modhost.

use modhost_config::Config;
use modhost_core::Kernel;
use modhost_protocols::SkillSummary;

use crate::cli::OutputFormat;
use crate::register::bundled_modules;

/// Load the bundled modules and print their skills.
pub(crate) async fn list_skills(
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let kernel = Kernel::from_config(config);
    kernel.load_modules(bundled_modules()).await?;

    let skills = kernel.catalog().list_skills();
    println!("{}", render(&skills, format)?);
    Ok(())
}

fn render(skills: &[SkillSummary], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(skills),
        OutputFormat::Table if skills.is_empty() => Ok("No skills found.".to_string()),
        OutputFormat::Table => {
            let mut out = format!("{:<20} {:<30} {}\n", "ID", "NAME", "MODULE");
            out.push_str(&"-".repeat(64));
            for skill in skills {
                out.push_str(&format!(
                    "\n{:<20} {:<30} {}",
                    skill.id, skill.name, skill.module_name
                ));
            }
            Ok(out)
        }
    }
}
