use anyhow::{Context, Result};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["target", "sourceRoot", "localize", "hoistWordLimit"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{field}' field"
        );
    }
    assert!(
        parsed.get("outputRoot").is_none(),
        "Output root follows the target unless set"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.run(test.init_command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "✓ Created .themegenrc.json\n");

    let content = test.read_file(".themegenrc.json")?;
    assert_config_content(&content)?;
    assert_snapshot!(content, @r#"
    {
      "target": "theme",
      "sourceRoot": "./",
      "localize": true,
      "delete": false,
      "ignoreAssets": [],
      "hoistWordLimit": 4
    }
    "#);

    Ok(())
}

#[test]
fn test_init_refuses_existing_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".themegenrc.json", r#"{ "target": "app" }"#)?;

    let output = test.run(test.init_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(output.stderr, "error: .themegenrc.json already exists\n");
    assert_eq!(
        test.read_file(".themegenrc.json")?,
        r#"{ "target": "app" }"#
    );

    Ok(())
}

#[test]
fn test_created_config_drives_build() -> Result<()> {
    let test = CliTest::new()?;
    test.run(test.init_command())?;
    test.write_file("snippets/price.liquid", "<t>On sale</t>")?;

    let output = test.run(test.build_command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        test.read_file("theme/snippets/price.liquid")?,
        r#"{{ "price.on_sale" | t }}"#
    );

    Ok(())
}
