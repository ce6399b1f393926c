//! Schema localizer.
//!
//! Rewrites every human-text field of a schema tree into a `t:` reference and
//! records the (path, original text) pair the reference points at. Texts the
//! frequency index marks as shared go to `<root>.all.<key>`; everything else
//! gets a path scoped to the node's position in the tree.

use crate::core::frequency::FrequencyIndex;
use crate::core::normalize::{NormalizedKey, normalize};
use crate::core::schema::{
    Block, ChoiceSetting, CustomBlock, InputSetting, Preset, Section, Setting, SettingsGroup,
    SettingsGroupBody, SettingsSchema, TextSetting,
};

/// Prefix marking a schema string as a translation reference.
pub const REFERENCE_MARKER: &str = "t:";

/// Scope holding hoisted texts, directly under the root.
pub const SHARED_SCOPE: &str = "all";

/// Root of section references in a theme.
pub const SECTIONS_ROOT: &str = "sections";

/// Root of app block references in an app extension.
pub const BLOCKS_ROOT: &str = "blocks";

/// Root of top-level settings schema references.
pub const SETTINGS_SCHEMA_ROOT: &str = "settings_schema";

/// A locale path (without the reference marker) and the text it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleEntry {
    pub path: String,
    pub text: String,
}

/// A localized node plus the scoped locale entries it references.
///
/// Shared entries are not listed here; they are read from the frequency index.
#[derive(Debug, Clone, PartialEq)]
pub struct Localized<T> {
    pub node: T,
    pub entries: Vec<LocaleEntry>,
}

/// Where a single text ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Shared(NormalizedKey),
    Local,
}

/// Per-scope counters for settings that have no id.
///
/// A fresh value starts every section, block and settings group. Counters only
/// advance when a scoped path is actually emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    header: usize,
    paragraph: usize,
}

pub struct SchemaLocalizer<'a> {
    root: &'a str,
    index: &'a FrequencyIndex,
}

impl<'a> SchemaLocalizer<'a> {
    pub fn new(root: &'a str, index: &'a FrequencyIndex) -> Self {
        Self { root, index }
    }

    pub fn placement(&self, text: &str) -> Placement {
        if self.index.is_shared(text) {
            Placement::Shared(normalize(text))
        } else {
            Placement::Local
        }
    }

    /// Localize a section (or app block definition) under `group`.
    ///
    /// The input is consumed; the caller keeps a clone if it needs the literal tree.
    pub fn localize_section(&self, section: Section, group: &str) -> Localized<Section> {
        let mut entries = Vec::new();
        let scope = format!("{}.{}", self.root, group);

        let Section {
            name,
            settings,
            blocks,
            presets,
            extra,
        } = section;

        let name = self.scoped(&mut entries, format!("{scope}.name"), name);
        let settings = settings.map(|settings| {
            self.localize_settings(&format!("{scope}.settings"), settings, &mut entries)
        });
        let blocks = blocks.map(|blocks| {
            blocks
                .into_iter()
                .map(|block| match block {
                    Block::Reserved(raw) => Block::Reserved(raw),
                    Block::Custom(custom) => {
                        Block::Custom(self.localize_block(&scope, custom, &mut entries))
                    }
                })
                .collect()
        });
        let presets = presets.map(|presets| {
            presets
                .into_iter()
                .map(|Preset { name, extra }| {
                    let path = format!("{scope}.presets.{}.name", normalize(&name));
                    Preset {
                        name: self.scoped(&mut entries, path, name),
                        extra,
                    }
                })
                .collect()
        });

        Localized {
            node: Section {
                name,
                settings,
                blocks,
                presets,
                extra,
            },
            entries,
        }
    }

    /// Localize the top-level settings schema. Theme metadata groups pass through.
    pub fn localize_settings_schema(&self, schema: SettingsSchema) -> Localized<SettingsSchema> {
        let mut entries = Vec::new();
        let node = schema
            .into_iter()
            .map(|group| match group {
                SettingsGroup::ThemeInfo(raw) => SettingsGroup::ThemeInfo(raw),
                SettingsGroup::Group(body) => {
                    SettingsGroup::Group(self.localize_settings_group(body, &mut entries))
                }
            })
            .collect();
        Localized { node, entries }
    }

    fn localize_settings_group(
        &self,
        group: SettingsGroupBody,
        entries: &mut Vec<LocaleEntry>,
    ) -> SettingsGroupBody {
        let scope = format!("{}.{}", self.root, normalize(&group.name));
        let name = self.scoped(entries, format!("{scope}.name"), group.name);
        let settings = group.settings.map(|settings| {
            self.localize_settings(&format!("{scope}.settings"), settings, entries)
        });
        SettingsGroupBody {
            name,
            settings,
            extra: group.extra,
        }
    }

    fn localize_block(
        &self,
        scope: &str,
        block: CustomBlock,
        entries: &mut Vec<LocaleEntry>,
    ) -> CustomBlock {
        let block_scope = format!("{scope}.blocks.{}", normalize(&block.name));
        let name = self.scoped(entries, format!("{block_scope}.name"), block.name);
        let settings = block.settings.map(|settings| {
            self.localize_settings(&format!("{block_scope}.settings"), settings, entries)
        });
        CustomBlock {
            kind: block.kind,
            name,
            settings,
            extra: block.extra,
        }
    }

    fn localize_settings(
        &self,
        base: &str,
        settings: Vec<Setting>,
        entries: &mut Vec<LocaleEntry>,
    ) -> Vec<Setting> {
        let mut counters = Counters::default();
        settings
            .into_iter()
            .map(|setting| {
                let (setting, next) = self.localize_setting(base, setting, counters, entries);
                counters = next;
                setting
            })
            .collect()
    }

    fn localize_setting(
        &self,
        base: &str,
        setting: Setting,
        counters: Counters,
        entries: &mut Vec<LocaleEntry>,
    ) -> (Setting, Counters) {
        match setting {
            Setting::Header(text) => {
                let (text, header) =
                    self.localize_numbered(base, "header", text, counters.header, entries);
                (Setting::Header(text), Counters { header, ..counters })
            }
            Setting::Paragraph(text) => {
                let (text, paragraph) =
                    self.localize_numbered(base, "paragraph", text, counters.paragraph, entries);
                (Setting::Paragraph(text), Counters { paragraph, ..counters })
            }
            Setting::Choice(choice) => {
                let field = format!("{base}.{}", choice.id);
                let options = choice.options.map(|options| {
                    options
                        .into_iter()
                        .enumerate()
                        .map(|(i, mut option)| {
                            let path = format!("{field}.options__{}.label", i + 1);
                            option.label = self.resolve(entries, path, option.label);
                            option
                        })
                        .collect()
                });
                let choice = ChoiceSetting {
                    label: self.resolve_field(entries, &field, "label", choice.label),
                    info: self.resolve_field(entries, &field, "info", choice.info),
                    options,
                    ..choice
                };
                (Setting::Choice(choice), counters)
            }
            Setting::Input(input) => {
                let field = format!("{base}.{}", input.id);
                let input = InputSetting {
                    label: self.resolve_field(entries, &field, "label", input.label),
                    info: self.resolve_field(entries, &field, "info", input.info),
                    placeholder: self.resolve_field(
                        entries,
                        &field,
                        "placeholder",
                        input.placeholder,
                    ),
                    ..input
                };
                (Setting::Input(input), counters)
            }
            Setting::Passthrough(raw) => (Setting::Passthrough(raw), counters),
        }
    }

    /// Header/paragraph content: `<base>.<kind>__<n>.content`, n counted from 1.
    fn localize_numbered(
        &self,
        base: &str,
        kind: &str,
        text: TextSetting,
        count: usize,
        entries: &mut Vec<LocaleEntry>,
    ) -> (TextSetting, usize) {
        let TextSetting { content, extra } = text;
        let Some(content) = content else {
            return (TextSetting { content: None, extra }, count);
        };
        let (content, count) = match self.placement(&content) {
            Placement::Shared(key) => (self.shared_reference(&key), count),
            Placement::Local => {
                let next = count + 1;
                let path = format!("{base}.{kind}__{next}.content");
                (self.scoped(entries, path, content), next)
            }
        };
        (
            TextSetting {
                content: Some(content),
                extra,
            },
            count,
        )
    }

    fn resolve_field(
        &self,
        entries: &mut Vec<LocaleEntry>,
        field: &str,
        name: &str,
        text: Option<String>,
    ) -> Option<String> {
        text.map(|text| self.resolve(entries, format!("{field}.{name}"), text))
    }

    /// Shared reference when hoisted, otherwise the scoped `path`.
    fn resolve(&self, entries: &mut Vec<LocaleEntry>, path: String, text: String) -> String {
        match self.placement(&text) {
            Placement::Shared(key) => self.shared_reference(&key),
            Placement::Local => self.scoped(entries, path, text),
        }
    }

    fn shared_reference(&self, key: &NormalizedKey) -> String {
        format!("{REFERENCE_MARKER}{}.{SHARED_SCOPE}.{key}", self.root)
    }

    fn scoped(&self, entries: &mut Vec<LocaleEntry>, path: String, text: String) -> String {
        let reference = format!("{REFERENCE_MARKER}{path}");
        entries.push(LocaleEntry { path, text });
        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frequency::DEFAULT_HOIST_WORD_LIMIT;
    use crate::core::schema::{parse_section, parse_settings_schema};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn section(json: &str) -> Section {
        parse_section(json).unwrap()
    }

    fn localize(sections: &[Section], at: usize) -> (Value, Vec<LocaleEntry>) {
        let index = FrequencyIndex::build(sections, DEFAULT_HOIST_WORD_LIMIT);
        let localizer = SchemaLocalizer::new(SECTIONS_ROOT, &index);
        let target = sections[at].clone();
        let group = normalize(&target.name);
        let localized = localizer.localize_section(target, group.as_str());
        (serde_json::to_value(&localized.node).unwrap(), localized.entries)
    }

    #[test]
    fn test_scoped_paths() {
        let hero = section(
            r#"{
                "name": "Hero Banner",
                "settings": [
                    { "type": "text", "id": "title", "label": "Title", "info": "Shown on top", "placeholder": "Welcome" },
                    { "type": "select", "id": "align", "label": "Alignment",
                      "options": [{ "value": "l", "label": "Left" }, { "value": "r", "label": "Right" }] }
                ]
            }"#,
        );

        let (value, entries) = localize(&[hero], 0);

        assert_eq!(
            value,
            json!({
                "name": "t:sections.hero_banner.name",
                "settings": [
                    { "type": "text", "id": "title",
                      "label": "t:sections.hero_banner.settings.title.label",
                      "info": "t:sections.hero_banner.settings.title.info",
                      "placeholder": "t:sections.hero_banner.settings.title.placeholder" },
                    { "type": "select", "id": "align",
                      "label": "t:sections.hero_banner.settings.align.label",
                      "options": [
                        { "value": "l", "label": "t:sections.hero_banner.settings.align.options__1.label" },
                        { "value": "r", "label": "t:sections.hero_banner.settings.align.options__2.label" }
                      ] }
                ]
            })
        );
        assert_eq!(entries[0].path, "sections.hero_banner.name");
        assert_eq!(entries[0].text, "Hero Banner");
        assert_eq!(entries.len(), 7);
    }

    #[test]
    fn test_repeated_text_goes_to_shared_scope() {
        let a = section(
            r#"{ "name": "A", "settings": [
                { "type": "text", "id": "first", "label": "Save changes" },
                { "type": "text", "id": "second", "label": "Save changes" }
            ] }"#,
        );

        let (value, entries) = localize(&[a], 0);

        assert_eq!(value["settings"][0]["label"], "t:sections.all.save_changes");
        assert_eq!(value["settings"][1]["label"], "t:sections.all.save_changes");
        assert!(entries.iter().all(|e| !e.path.contains("save_changes")));
    }

    #[test]
    fn test_sharing_is_global_across_sections() {
        let a = section(r#"{ "name": "A", "settings": [{ "type": "text", "id": "x", "label": "Color" }] }"#);
        let b = section(r#"{ "name": "B", "settings": [{ "type": "color", "id": "y", "label": "color" }] }"#);

        let (value, _) = localize(&[a, b], 1);
        assert_eq!(value["settings"][0]["label"], "t:sections.all.color");
    }

    #[test]
    fn test_header_counters_only_advance_on_scoped_paths() {
        let a = section(
            r#"{ "name": "A", "settings": [
                { "type": "header", "content": "Layout" },
                { "type": "header", "content": "Typography" },
                { "type": "paragraph", "content": "Pick one" },
                { "type": "header", "content": "Typography" },
                { "type": "header", "content": "Colors" }
            ] }"#,
        );

        let (value, _) = localize(&[a], 0);
        let contents: Vec<&str> = value["settings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["content"].as_str().unwrap())
            .collect();

        assert_eq!(
            contents,
            vec![
                "t:sections.a.settings.header__1.content",
                "t:sections.all.typography",
                "t:sections.a.settings.paragraph__1.content",
                "t:sections.all.typography",
                "t:sections.a.settings.header__2.content",
            ]
        );
    }

    #[test]
    fn test_counters_reset_per_block() {
        let a = section(
            r#"{ "name": "A",
                "settings": [{ "type": "header", "content": "Section header" }],
                "blocks": [
                    { "type": "one", "name": "Slide", "settings": [{ "type": "header", "content": "Slide header" }] },
                    { "type": "two", "name": "Quote", "settings": [{ "type": "header", "content": "Quote header" }] }
                ]
            }"#,
        );

        let (value, _) = localize(&[a], 0);
        assert_eq!(value["settings"][0]["content"], "t:sections.a.settings.header__1.content");
        assert_eq!(value["blocks"][0]["name"], "t:sections.a.blocks.slide.name");
        assert_eq!(
            value["blocks"][0]["settings"][0]["content"],
            "t:sections.a.blocks.slide.settings.header__1.content"
        );
        assert_eq!(
            value["blocks"][1]["settings"][0]["content"],
            "t:sections.a.blocks.quote.settings.header__1.content"
        );
    }

    #[test]
    fn test_reserved_blocks_and_passthrough_untouched() {
        let a = section(
            r#"{ "name": "A",
                "settings": [{ "type": "color_scheme_group", "id": "scheme", "label": "Scheme" }],
                "blocks": [{ "type": "@app", "name": "App" }]
            }"#,
        );

        let (value, entries) = localize(&[a], 0);
        assert_eq!(value["settings"][0]["label"], "Scheme");
        assert_eq!(value["blocks"][0], json!({ "type": "@app", "name": "App" }));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_presets_and_absent_fields() {
        let a = section(
            r#"{ "name": "A",
                "settings": [{ "type": "checkbox", "id": "show", "default": true }],
                "presets": [{ "name": "Default Look", "category": "Image" }]
            }"#,
        );

        let (value, entries) = localize(&[a], 0);
        assert_eq!(value["settings"][0], json!({ "type": "checkbox", "id": "show", "default": true }));
        assert_eq!(
            value["presets"][0],
            json!({ "name": "t:sections.a.presets.default_look.name", "category": "Image" })
        );
        assert_eq!(
            entries.last().unwrap(),
            &LocaleEntry {
                path: "sections.a.presets.default_look.name".to_string(),
                text: "Default Look".to_string(),
            }
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let a = section(r#"{ "name": "A", "settings": [{ "type": "text", "id": "x", "label": "X" }] }"#);
        let before = a.clone();
        let _ = localize(std::slice::from_ref(&a), 0);
        assert_eq!(a, before);
    }

    #[test]
    fn test_settings_schema() {
        let schema = parse_settings_schema(
            r#"[
                { "name": "theme_info", "theme_name": "Dawn", "theme_author": "Shopify" },
                { "name": "Colors", "settings": [
                    { "type": "header", "content": "Buttons" },
                    { "type": "color", "id": "bg", "label": "Background" },
                    { "type": "color", "id": "fg", "label": "Background" }
                ] }
            ]"#,
        )
        .unwrap();

        let index = FrequencyIndex::default();
        let localizer = SchemaLocalizer::new(SETTINGS_SCHEMA_ROOT, &index);
        let localized = localizer.localize_settings_schema(schema);
        let value = serde_json::to_value(&localized.node).unwrap();

        assert_eq!(value[0]["name"], "theme_info");
        assert_eq!(value[1]["name"], "t:settings_schema.colors.name");
        assert_eq!(
            value[1]["settings"][0]["content"],
            "t:settings_schema.colors.settings.header__1.content"
        );
        assert_eq!(value[1]["settings"][2]["label"], "t:settings_schema.colors.settings.fg.label");
        assert_eq!(localized.entries.len(), 4);
    }
}
