use super::table::id_name_columns;
use super::{BoundSelector, LabelDefaults, SelectorOptions};
use crate::api::ListingBackend;
use crate::model::{Skill, SkillSon};
use crate::source::EagerList;
use std::sync::Arc;
use tokio::runtime::Handle;

pub const SKILLS_RESOURCE: &str = "skills";
pub const SKILL_SONS_RESOURCE: &str = "skill-sons";

const SKILL_DEFAULTS: LabelDefaults = LabelDefaults {
    button: "Seleccionar habilidades",
    title: "Seleccionar habilidades",
};

const SKILL_SON_DEFAULTS: LabelDefaults = LabelDefaults {
    button: "Seleccionar sub-habilidades",
    title: "Seleccionar sub-habilidades",
};

/// Skills are a small fixed vocabulary, fetched in full on mount.
pub type SkillSelector = BoundSelector<Skill, EagerList<Skill>>;

pub type SkillSonSelector = BoundSelector<SkillSon, EagerList<SkillSon>>;

impl SkillSelector {
    pub fn new(options: SelectorOptions<Skill>, backend: Arc<dyn ListingBackend>, runtime: Handle) -> Self {
        let source = EagerList::new(backend, runtime, SKILLS_RESOURCE);
        BoundSelector::bind(options, &SKILL_DEFAULTS, source, id_name_columns())
    }
}

impl SkillSonSelector {
    pub fn new(
        options: SelectorOptions<SkillSon>,
        backend: Arc<dyn ListingBackend>,
        runtime: Handle,
    ) -> Self {
        let source = EagerList::new(backend, runtime, SKILL_SONS_RESOURCE);
        BoundSelector::bind(options, &SKILL_SON_DEFAULTS, source, id_name_columns())
    }
}
