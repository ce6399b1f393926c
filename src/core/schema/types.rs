//! Schema node types.
//!
//! Settings arrive as loosely shaped JSON objects. They are converted into a
//! variant per setting kind, each carrying exactly the human-text fields that
//! kind may hold. Every other key is kept in `extra`, in source order, and
//! written back untouched.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// Keys a node carries that we do not model explicitly.
pub type Extra = Map<String, Value>;

pub const HEADER: &str = "header";
pub const PARAGRAPH: &str = "paragraph";
pub const SELECT: &str = "select";
pub const RADIO: &str = "radio";
pub const COLOR_SCHEME_GROUP: &str = "color_scheme_group";

/// Keys read by the generator that must not leak into generated schemas.
pub const TOOL_ONLY_FIELDS: &[&str] = &["disabled_block_files", "generate_block_files"];

/// Marker that flags a top-level settings group as theme metadata.
const THEME_INFO_MARKER: &str = "theme_author";

// ============================================================
// Sections, blocks, presets
// ============================================================

/// A section (theme) or app block definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<Setting>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<Vec<Preset>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Section {
    /// Drop keys that only steer the generator.
    pub fn without_tool_fields(mut self) -> Self {
        for key in TOOL_ONLY_FIELDS {
            self.extra.shift_remove(*key);
        }
        self
    }

    /// Blocks that have an owning implementation (reserved blocks excluded).
    pub fn custom_blocks(&self) -> impl Iterator<Item = &CustomBlock> {
        self.blocks.iter().flatten().filter_map(|block| match block {
            Block::Custom(custom) => Some(custom),
            Block::Reserved(_) => None,
        })
    }

    /// All settings of the section followed by the settings of each custom block.
    pub fn all_settings(&self) -> impl Iterator<Item = &Setting> {
        self.settings
            .iter()
            .flatten()
            .chain(self.custom_blocks().flat_map(|b| b.settings.iter().flatten()))
    }
}

/// A block inside a section.
///
/// Blocks whose type starts with `@` (e.g. `@app`) are platform-reserved:
/// they have no owning implementation and are copied verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Block {
    Reserved(Extra),
    Custom(CustomBlock),
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Extra::deserialize(deserializer)?;
        let reserved = matches!(map.get("type"), Some(Value::String(kind)) if kind.starts_with('@'));
        if reserved {
            return Ok(Block::Reserved(map));
        }
        CustomBlock::deserialize(Value::Object(map))
            .map(Block::Custom)
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<Setting>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================
// Settings
// ============================================================

/// A single setting, by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSetting", into = "RawSetting")]
pub enum Setting {
    Header(TextSetting),
    Paragraph(TextSetting),
    Choice(ChoiceSetting),
    Input(InputSetting),
    /// Settings without an id, or kinds that carry no translatable text.
    Passthrough(RawSetting),
}

/// `header` / `paragraph`: display-only, no id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSetting {
    pub content: Option<String>,
    pub extra: Extra,
}

/// `select` / `radio`: a labelled list of options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSetting {
    pub kind: String,
    pub id: String,
    pub label: Option<String>,
    pub info: Option<String>,
    pub options: Option<Vec<SelectOption>>,
    pub extra: Extra,
}

/// Any other kind carrying an id.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSetting {
    pub kind: String,
    pub id: String,
    pub label: Option<String>,
    pub info: Option<String>,
    pub placeholder: Option<String>,
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Wire shape of a setting: its `type` plus every other key in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSetting {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Extra,
}

impl Setting {
    /// Human text carried by this setting, in field order.
    pub fn translatable_texts(&self) -> Vec<&str> {
        match self {
            Setting::Header(text) | Setting::Paragraph(text) => {
                text.content.as_deref().into_iter().collect()
            }
            Setting::Choice(choice) => choice
                .label
                .as_deref()
                .into_iter()
                .chain(choice.info.as_deref())
                .chain(choice.options.iter().flatten().map(|o| o.label.as_str()))
                .collect(),
            Setting::Input(input) => input
                .label
                .as_deref()
                .into_iter()
                .chain(input.info.as_deref())
                .chain(input.placeholder.as_deref())
                .collect(),
            Setting::Passthrough(_) => Vec::new(),
        }
    }
}

impl From<RawSetting> for Setting {
    fn from(raw: RawSetting) -> Self {
        let RawSetting { kind, mut fields } = raw;

        match kind.as_str() {
            HEADER | PARAGRAPH => {
                let text = TextSetting {
                    content: take_string(&mut fields, "content"),
                    extra: fields,
                };
                if kind == HEADER {
                    Setting::Header(text)
                } else {
                    Setting::Paragraph(text)
                }
            }
            COLOR_SCHEME_GROUP => Setting::Passthrough(RawSetting { kind, fields }),
            _ if !matches!(fields.get("id"), Some(Value::String(_))) => {
                Setting::Passthrough(RawSetting { kind, fields })
            }
            SELECT | RADIO => {
                let parsed = fields.get("options").map(Vec::<SelectOption>::deserialize);
                let options = match parsed {
                    None => None,
                    Some(Ok(options)) => Some(options),
                    Some(Err(_)) => return Setting::Passthrough(RawSetting { kind, fields }),
                };
                fields.shift_remove("options");
                Setting::Choice(ChoiceSetting {
                    id: take_string(&mut fields, "id").unwrap_or_default(),
                    label: take_string(&mut fields, "label"),
                    info: take_string(&mut fields, "info"),
                    options,
                    extra: fields,
                    kind,
                })
            }
            _ => Setting::Input(InputSetting {
                id: take_string(&mut fields, "id").unwrap_or_default(),
                label: take_string(&mut fields, "label"),
                info: take_string(&mut fields, "info"),
                placeholder: take_string(&mut fields, "placeholder"),
                extra: fields,
                kind,
            }),
        }
    }
}

impl From<Setting> for RawSetting {
    fn from(setting: Setting) -> Self {
        match setting {
            Setting::Header(text) => assemble(HEADER, [("content", text.content)], text.extra),
            Setting::Paragraph(text) => {
                assemble(PARAGRAPH, [("content", text.content)], text.extra)
            }
            Setting::Choice(choice) => {
                let mut raw = assemble(
                    &choice.kind,
                    [
                        ("id", Some(choice.id)),
                        ("label", choice.label),
                        ("info", choice.info),
                    ],
                    Extra::new(),
                );
                if let Some(options) = choice.options {
                    let options = options.into_iter().map(SelectOption::into_value).collect();
                    raw.fields.insert("options".to_string(), Value::Array(options));
                }
                raw.fields.extend(choice.extra);
                raw
            }
            Setting::Input(input) => assemble(
                &input.kind,
                [
                    ("id", Some(input.id)),
                    ("label", input.label),
                    ("info", input.info),
                    ("placeholder", input.placeholder),
                ],
                input.extra,
            ),
            Setting::Passthrough(raw) => raw,
        }
    }
}

impl SelectOption {
    fn into_value(self) -> Value {
        let mut map = Extra::new();
        map.insert("value".to_string(), self.value);
        map.insert("label".to_string(), Value::String(self.label));
        map.extend(self.extra);
        Value::Object(map)
    }
}

/// Remove `key` from `fields` only when it holds a string.
fn take_string(fields: &mut Extra, key: &str) -> Option<String> {
    if !matches!(fields.get(key), Some(Value::String(_))) {
        return None;
    }
    match fields.shift_remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn assemble<const N: usize>(
    kind: &str,
    declared: [(&str, Option<String>); N],
    extra: Extra,
) -> RawSetting {
    let mut fields = Extra::new();
    for (key, value) in declared {
        if let Some(value) = value {
            fields.insert(key.to_string(), Value::String(value));
        }
    }
    fields.extend(extra);
    RawSetting {
        kind: kind.to_string(),
        fields,
    }
}

// ============================================================
// Top-level settings schema
// ============================================================

/// One entry of the top-level settings schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingsGroup {
    /// Theme metadata (`theme_name`, `theme_author`, ...), copied verbatim.
    ThemeInfo(Extra),
    Group(SettingsGroupBody),
}

impl<'de> Deserialize<'de> for SettingsGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Extra::deserialize(deserializer)?;
        if map.contains_key(THEME_INFO_MARKER) {
            return Ok(SettingsGroup::ThemeInfo(map));
        }
        SettingsGroupBody::deserialize(Value::Object(map))
            .map(SettingsGroup::Group)
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsGroupBody {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<Setting>>,
    #[serde(flatten)]
    pub extra: Extra,
}

pub type SettingsSchema = Vec<SettingsGroup>;
