use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Anything that can be listed inside a selector. Identity is the numeric id only.
pub trait Selectable: Clone + Serialize + DeserializeOwned + Send + 'static {
    fn id(&self) -> i64;

    /// Short human label used by the host screen for committed selections.
    fn display_name(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    Single,
    #[default]
    Multiple,
}

/// Marker drawn in front of each row in the selector table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowControl {
    Radio,
    Checkbox,
}

impl SelectionMode {
    pub fn row_control(self) -> RowControl {
        match self {
            SelectionMode::Single => RowControl::Radio,
            SelectionMode::Multiple => RowControl::Checkbox,
        }
    }
}

impl RowControl {
    pub fn marker(self, checked: bool) -> &'static str {
        match (self, checked) {
            (RowControl::Radio, true) => "(•)",
            (RowControl::Radio, false) => "( )",
            (RowControl::Checkbox, true) => "[x]",
            (RowControl::Checkbox, false) => "[ ]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_eng: String,
}

/// Second level of the skill taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSon {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_eng: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_eng: String,
}

macro_rules! impl_selectable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Selectable for $ty {
                fn id(&self) -> i64 {
                    self.id
                }

                fn display_name(&self) -> String {
                    self.name.clone()
                }
            }
        )+
    };
}

impl_selectable!(Image, Video, Skill, SkillSon, Label);
