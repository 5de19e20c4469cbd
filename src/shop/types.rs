use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CHARACTER_SCHEMA_VERSION: u8 = 1;
pub const SCENE_SCHEMA_VERSION: u8 = 1;
pub const ARMOR_SCHEMA_VERSION: u8 = 1;

pub type SceneId = u64;
pub type ArmorId = u64;

/// Menu group the client renders as the regular navigation list.
pub const DEFAULT_GROUP: &str = "lotgd/core/default";
/// Menu group whose actions are takeable but never listed.
pub const HIDDEN_GROUP: &str = "lotgd/core/hidden";

// ============================================================================
// Scenes
// ============================================================================

/// A node in the host's navigable scene graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SceneRecord {
    /// Zero until the scene repository assigns an id on first save.
    pub id: SceneId,
    pub template: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub parents: Vec<SceneId>,
    #[serde(default)]
    pub children: Vec<SceneId>,
    pub schema_version: u8,
}

impl SceneRecord {
    pub fn new(template: &str, title: &str, description: &str) -> Self {
        Self {
            id: 0,
            template: template.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            parents: Vec::new(),
            children: Vec::new(),
            schema_version: SCENE_SCHEMA_VERSION,
        }
    }

    pub fn with_parent(mut self, parent: SceneId) -> Self {
        self.parents = vec![parent];
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

// ============================================================================
// Armor
// ============================================================================

/// A piece of armor as offered by the inventory module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Armor {
    pub id: ArmorId,
    pub name: String,
    /// Price in gold.
    pub cost: i64,
    /// Character level the armor is offered at.
    pub level: u32,
    pub defense: u32,
    pub schema_version: u8,
}

impl Armor {
    pub fn new(id: ArmorId, name: &str, cost: i64, level: u32, defense: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            cost,
            level,
            defense,
            schema_version: ARMOR_SCHEMA_VERSION,
        }
    }
}

// ============================================================================
// Characters
// ============================================================================

/// The player character a viewpoint belongs to.
///
/// `gold` and `armor_id` belong to the wealth and inventory modules; go through
/// [`crate::shop::Wealth`] and [`crate::shop::Inventory`] instead of touching them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub armor_id: Option<ArmorId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl CharacterRecord {
    pub fn new(id: &str, name: &str, level: u32) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_ascii_lowercase(),
            name: name.to_string(),
            level,
            gold: 0,
            armor_id: None,
            created_at: now,
            updated_at: now,
            schema_version: CHARACTER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Viewpoints, actions and forms
// ============================================================================

/// A navigable link from the current viewpoint to another scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub destination: SceneId,
    #[serde(default)]
    pub title: Option<String>,
}

impl Action {
    pub fn new(destination: SceneId) -> Self {
        Self {
            destination,
            title: None,
        }
    }

    pub fn titled(destination: SceneId, title: &str) -> Self {
        Self {
            destination,
            title: Some(title.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionGroup {
    pub id: String,
    pub title: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormElementKind {
    Button,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormElementOptions {
    pub disabled: bool,
}

impl FormElementOptions {
    pub fn none() -> Self {
        Self { disabled: false }
    }

    pub fn disabled() -> Self {
        Self { disabled: true }
    }
}

/// One selectable option of a [`Form`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormElement {
    /// Request parameter the value is submitted under.
    pub name: String,
    pub kind: FormElementKind,
    pub label: String,
    pub value: String,
    pub options: FormElementOptions,
}

impl FormElement {
    pub fn is_disabled(&self) -> bool {
        self.options.disabled
    }
}

/// A set of selectable options submitted back to `action`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Form {
    pub elements: Vec<FormElement>,
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Attachment {
    Form(Form),
}

/// The per-request rendered view shown to a character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Viewpoint {
    pub owner: String,
    pub scene_id: SceneId,
    pub template: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub action_groups: Vec<ActionGroup>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Viewpoint {
    /// Fresh viewpoint for `owner` arriving at `scene`, as the host builds it before dispatch.
    pub fn from_scene(owner: &CharacterRecord, scene: &SceneRecord) -> Self {
        Self {
            owner: owner.id.clone(),
            scene_id: scene.id,
            template: scene.template.clone(),
            title: scene.title.clone(),
            description: scene.description.clone(),
            action_groups: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Add `action` to the group `group_id`, creating the group if needed.
    pub fn add_action_to_group(&mut self, action: Action, group_id: &str) {
        if let Some(group) = self.action_groups.iter_mut().find(|g| g.id == group_id) {
            group.actions.push(action);
            return;
        }
        let title = if group_id == HIDDEN_GROUP { "Hidden" } else { "Navigation" };
        self.action_groups.push(ActionGroup {
            id: group_id.to_string(),
            title: title.to_string(),
            actions: vec![action],
        });
    }

    pub fn actions_in_group(&self, group_id: &str) -> &[Action] {
        self.action_groups
            .iter()
            .find(|g| g.id == group_id)
            .map(|g| g.actions.as_slice())
            .unwrap_or(&[])
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn forms(&self) -> impl Iterator<Item = &Form> {
        self.attachments.iter().map(|a| match a {
            Attachment::Form(form) => form,
        })
    }
}

// ============================================================================
// Module configuration
// ============================================================================

/// Host-side registration record for an installed module, with an open property bag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModuleRecord {
    pub name: String,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl ModuleRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: HashMap::new(),
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: &str, value: serde_json::Value) {
        self.properties.insert(key.to_string(), value);
    }

    pub fn remove_property(&mut self, key: &str) -> Option<serde_json::Value> {
        self.properties.remove(key)
    }
}

/// Parameters submitted with a navigation request.
pub type Parameters = HashMap<String, String>;
