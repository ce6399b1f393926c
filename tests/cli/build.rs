use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::CliTest;

const HERO_SCHEMA: &str = r#"{
  "name": "Hero",
  "settings": [
    { "type": "text", "id": "title", "label": "Title" }
  ]
}"#;

fn theme_project() -> Result<CliTest> {
    CliTest::with_files(&[
        ("sections/hero/schema.json", HERO_SCHEMA),
        ("sections/hero/hero.liquid", "<h1><t>Shop the sale</t></h1>"),
        ("snippets/price.liquid", "<span><t>On sale</t></span>"),
        ("layout/theme.liquid", "<html>{{ content_for_layout }}</html>"),
        (
            "config/settings_schema.json",
            r#"[{ "name": "theme_info", "theme_name": "Demo", "theme_author": "Me" }]"#,
        ),
        ("templates/index.json", r#"{ "sections": {} }"#),
        ("assets/app.js", "console.log(1);"),
    ])
}

#[test]
fn test_build_theme() -> Result<()> {
    let test = theme_project()?;
    let output = test.run(test.build_command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.stdout,
        "✓ Generated 8 artifacts (8 written, 0 unchanged, 0 deleted)\n"
    );

    let hero = test.read_file("theme/sections/hero.liquid")?;
    assert!(hero.starts_with("<h1>{{ \"hero.shop_the\" | t }}</h1>\n{% schema %}\n{\n"));
    assert!(hero.ends_with("}\n{% endschema %}\n"));
    assert!(hero.contains(r#""name": "t:sections.hero.name""#));

    assert_eq!(
        test.read_file("theme/snippets/price.liquid")?,
        r#"<span>{{ "price.on_sale" | t }}</span>"#
    );
    assert_eq!(
        test.read_file("theme/layout/theme.liquid")?,
        "<html>{{ content_for_layout }}</html>"
    );
    assert_eq!(
        test.read_json("theme/locales/en.default.json")?,
        json!({
            "hero": { "shop_the": "Shop the sale" },
            "price": { "on_sale": "On sale" }
        })
    );
    assert_eq!(
        test.read_json("theme/locales/en.default.schema.json")?["sections"]["hero"]["name"],
        json!("Hero")
    );
    assert_eq!(
        test.read_json("theme/config/settings_schema.json")?,
        json!([{ "name": "theme_info", "theme_name": "Demo", "theme_author": "Me" }])
    );
    assert_eq!(test.read_file("theme/assets/app.js")?, "console.log(1);");
    assert_eq!(
        test.read_file("theme/templates/index.json")?,
        r#"{ "sections": {} }"#
    );

    Ok(())
}

#[test]
fn test_second_build_is_unchanged() -> Result<()> {
    let test = CliTest::with_files(&[
        ("sections/hero/schema.json", HERO_SCHEMA),
        ("sections/hero/hero.liquid", "<h1><t>Shop the sale</t></h1>"),
    ])?;

    let first = test.run(test.build_command())?;
    assert_eq!(
        first.stdout,
        "✓ Generated 3 artifacts (3 written, 0 unchanged, 0 deleted)\n"
    );

    let second = test.run(test.build_command())?;
    assert_eq!(second.code, Some(0));
    assert_eq!(
        second.stdout,
        "✓ Generated 3 artifacts (0 written, 3 unchanged, 0 deleted)\n"
    );

    Ok(())
}

#[test]
fn test_seed_is_never_overwritten() -> Result<()> {
    let test = theme_project()?;
    test.run(test.build_command())?;

    test.write_file("theme/templates/index.json", r#"{ "edited": true }"#)?;
    test.write_file("templates/index.json", r#"{ "changed": true }"#)?;
    test.run(test.build_command())?;

    assert_eq!(
        test.read_file("theme/templates/index.json")?,
        r#"{ "edited": true }"#
    );

    Ok(())
}

#[test]
fn test_changed_asset_is_rewritten() -> Result<()> {
    let test = theme_project()?;
    test.run(test.build_command())?;

    test.write_file("assets/app.js", "console.log(2);")?;
    let output = test.run(test.build_command())?;

    assert_eq!(
        output.stdout,
        "✓ Generated 8 artifacts (1 written, 7 unchanged, 0 deleted)\n"
    );
    assert_eq!(test.read_file("theme/assets/app.js")?, "console.log(2);");

    Ok(())
}

#[test]
fn test_delete_prunes_removed_section() -> Result<()> {
    let test = CliTest::with_files(&[
        ("sections/a/schema.json", r#"{ "name": "A" }"#),
        ("sections/a/a.liquid", "a"),
        ("sections/b/schema.json", r#"{ "name": "B" }"#),
        ("sections/b/b.liquid", "b"),
    ])?;
    test.run(test.build_command())?;
    assert!(test.exists("theme/sections/b.liquid"));

    test.remove("sections/b")?;
    test.run(test.build_command())?;
    assert!(test.exists("theme/sections/b.liquid"));

    let mut cmd = test.build_command();
    cmd.args(["--delete", "--verbose"]);
    let output = test.run(cmd)?;

    assert_eq!(output.code, Some(0));
    assert!(
        output
            .stdout
            .contains("Deleted: ./theme/sections/b.liquid\n"),
        "{}",
        output.stdout
    );
    assert!(output.stdout.ends_with(", 1 deleted)\n"));
    assert!(!test.exists("theme/sections/b.liquid"));
    assert!(test.exists("theme/sections/a.liquid"));

    Ok(())
}

#[test]
fn test_delete_keeps_current_output() -> Result<()> {
    let test = theme_project()?;
    let mut cmd = test.build_command();
    cmd.arg("--delete");
    test.run(cmd)?;

    let mut cmd = test.build_command();
    cmd.arg("--delete");
    let output = test.run(cmd)?;

    assert_eq!(
        output.stdout,
        "✓ Generated 8 artifacts (0 written, 8 unchanged, 0 deleted)\n"
    );
    assert!(test.exists("theme/sections/hero.liquid"));
    assert!(test.exists("theme/snippets/price.liquid"));
    assert!(test.exists("theme/layout/theme.liquid"));

    Ok(())
}

#[test]
fn test_delete_keeps_output_of_broken_source() -> Result<()> {
    let test = CliTest::with_files(&[
        ("sections/a/schema.json", r#"{ "name": "A" }"#),
        ("sections/a/a.liquid", "a"),
    ])?;
    test.run(test.build_command())?;

    test.write_file("sections/a/schema.json", r#"{ "name": "A", }"#)?;
    let mut cmd = test.build_command();
    cmd.arg("--delete");
    let output = test.run(cmd)?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("missing-schema"));
    assert!(output.stdout.ends_with(", 0 deleted)\n"), "{}", output.stdout);
    assert!(test.exists("theme/sections/a.liquid"));

    Ok(())
}

#[test]
fn test_duplicate_snippet_is_reported_and_stable() -> Result<()> {
    let test = CliTest::with_files(&[
        ("sections/hero/price.card.liquid", "colocated"),
        ("snippets/price.card.liquid", "standalone"),
    ])?;

    let first = test.run(test.build_command())?;
    assert_eq!(first.code, Some(0));
    assert!(first.stdout.contains("duplicate-output"), "{}", first.stdout);
    assert_eq!(
        test.read_file("theme/snippets/price.card.liquid")?,
        "colocated"
    );

    let second = test.run(test.build_command())?;
    assert!(second.stdout.ends_with("(0 written, 3 unchanged, 0 deleted)\n"));

    Ok(())
}

#[test]
fn test_config_paths_are_relative_to_config_file() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            ".themegenrc.json",
            r#"{ "sourceRoot": "./storefront", "outputRoot": "./dist" }"#,
        ),
        ("storefront/snippets/price.liquid", "price"),
        ("packages/app/.keep", ""),
    ])?;

    let mut cmd = test.build_command();
    cmd.current_dir(test.root().join("packages/app"));
    let output = test.run(cmd)?;

    assert_eq!(output.code, Some(0), "{}", output.stderr);
    assert_eq!(test.read_file("dist/snippets/price.liquid")?, "price");
    assert!(!test.exists("packages/app/dist"));

    Ok(())
}

#[test]
fn test_delete_keeps_translations_snippets() -> Result<()> {
    let test = CliTest::with_files(&[("snippets/price.liquid", "price")])?;
    test.write_file("theme/snippets/cart_translations.liquid", "hand written")?;

    let mut cmd = test.build_command();
    cmd.arg("--delete");
    let output = test.run(cmd)?;

    assert!(output.stdout.ends_with(", 0 deleted)\n"));
    assert_eq!(
        test.read_file("theme/snippets/cart_translations.liquid")?,
        "hand written"
    );

    Ok(())
}

#[test]
fn test_no_localization() -> Result<()> {
    let test = theme_project()?;
    let mut cmd = test.build_command();
    cmd.arg("--no-localization");
    let output = test.run(cmd)?;

    assert_eq!(output.code, Some(0));
    let hero = test.read_file("theme/sections/hero.liquid")?;
    assert!(hero.starts_with("<h1>Shop the sale</h1>\n{% schema %}\n"));
    assert!(hero.contains(r#""name": "Hero""#));
    assert!(!test.exists("theme/locales"));

    Ok(())
}

#[test]
fn test_before_and_after_render_from_config() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            ".themegenrc.json",
            r#"{ "beforeRender": "{% render 'open' %}", "afterRender": "{% render 'close' %}" }"#,
        ),
        ("sections/hero/schema.json", r#"{ "name": "Hero" }"#),
        ("sections/hero/hero.liquid", "<h1>Hero</h1>"),
    ])?;
    test.run(test.build_command())?;

    let hero = test.read_file("theme/sections/hero.liquid")?;
    assert!(hero.starts_with(
        "{% render 'open' %}\n<h1>Hero</h1>\n{% render 'close' %}\n{% schema %}\n"
    ));

    Ok(())
}

#[test]
fn test_app_target_prefixes_classes() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "blocks/rating/schema.json",
            r#"{ "name": "Rating", "target": "section" }"#,
        ),
        (
            "blocks/rating/rating.liquid",
            r#"<div class="flex hover:underline"><t>Rate it</t></div>"#,
        ),
    ])?;
    let mut cmd = test.build_command();
    cmd.args(["--target", "app"]);
    let output = test.run(cmd)?;

    assert_eq!(output.code, Some(0));
    let rating = test.read_file("extensions/app/blocks/rating.liquid")?;
    assert!(rating.starts_with(
        r#"<div class="tw-flex hover:tw-underline">{{ "rating.rate_it" | t }}</div>"#
    ));
    assert!(rating.contains(r#""name": "t:blocks.rating.name""#));
    assert_eq!(
        test.read_json("extensions/app/locales/en.default.json")?,
        json!({ "rating": { "rate_it": "Rate it" } })
    );

    Ok(())
}

#[test]
fn test_output_root_from_environment() -> Result<()> {
    let test = CliTest::with_files(&[("snippets/price.liquid", "price")])?;
    let mut cmd = test.build_command();
    cmd.env("THEMEGEN_OUTPUT_ROOT", "./dist");
    let output = test.run(cmd)?;

    assert_eq!(output.code, Some(0));
    assert_eq!(test.read_file("dist/snippets/price.liquid")?, "price");
    assert!(!test.exists("theme"));

    Ok(())
}

#[test]
fn test_malformed_span_is_a_warning() -> Result<()> {
    let test = CliTest::with_files(&[("snippets/card.liquid", "<span><t>Buy now</span>")])?;
    let output = test.run(test.build_command())?;

    assert_eq!(output.code, Some(0));
    assert_eq!(
        output.stdout,
        r#"warning: "unclosed <t> tag"  malformed-span
  --> snippets/card.liquid:1:7
  |
1 | <span><t>Buy now</span>
  |       ^
  = note: left as written, no translation was extracted
  = hint: close the span with </t>

✘ 1 problem (0 errors, 1 warning)
✓ Generated 3 artifacts (3 written, 0 unchanged, 0 deleted)
"#
    );
    assert_eq!(
        test.read_file("theme/snippets/card.liquid")?,
        "<span><t>Buy now</span>"
    );

    Ok(())
}

#[test]
fn test_broken_schema_fails_but_continues() -> Result<()> {
    let test = CliTest::with_files(&[
        ("sections/broken/schema.json", "{ not json"),
        ("sections/broken/broken.liquid", "broken"),
        ("sections/hero/schema.json", r#"{ "name": "Hero" }"#),
        ("sections/hero/hero.liquid", "hero"),
    ])?;
    let output = test.run(test.build_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("  --> sections/broken/schema.json\n"));
    assert!(output.stdout.contains("missing-schema"));
    assert!(output.stdout.contains("✘ 1 problem (1 error, 0 warnings)"));
    assert!(test.exists("theme/sections/hero.liquid"));
    assert!(!test.exists("theme/sections/broken.liquid"));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_files(&[(".themegenrc.json", r#"{ "classPrefix": "tw:" }"#)])?;
    let output = test.run(test.build_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("classPrefix"), "{}", output.stderr);

    Ok(())
}

#[test]
fn test_missing_source_root_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    let mut cmd = test.build_command();
    cmd.args(["--source-root", "missing"]);
    let output = test.run(cmd)?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.starts_with("Error: "), "{}", output.stderr);

    Ok(())
}
