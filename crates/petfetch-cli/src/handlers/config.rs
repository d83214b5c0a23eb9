//! `config` command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Print the effective settings as pretty JSON.
pub fn execute(ctx: &CliContext) -> Result<()> {
    println!("{}", render(ctx)?);
    Ok(())
}

fn render(ctx: &CliContext) -> Result<String> {
    let mut settings = ctx.settings.clone();
    // Show the batch as it will actually run.
    settings.pairs = Some(settings.resolved_pairs());
    Ok(serde_json::to_string_pretty(&settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap_with_env};
    use tempfile::tempdir;

    #[test]
    fn test_rendered_settings_resolve_destinations() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("petfetch.json");
        std::fs::write(&path, r#"{"output_dir": "/srv/pets"}"#).unwrap();
        let ctx = bootstrap_with_env(CliConfig::new(Some(path)), |_| None).unwrap();

        let json: serde_json::Value = serde_json::from_str(&render(&ctx).unwrap()).unwrap();

        assert_eq!(json["method"], "get_pet_image");
        assert_eq!(json["pairs"][0]["kind"], "cat");
        assert_eq!(json["pairs"][0]["destination"], "/srv/pets/cat.jpg");
    }
}
