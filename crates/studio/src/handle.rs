//! UI instance handles
//!
//! The designer, form and viewer all expose their template and options;
//! only the form and viewer carry input records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{PoisonError, RwLock};
use template::{Inputs, Template};

/// Options a UI instance was created with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UiOptions {
    pub fn with_lang(lang: &str) -> Self {
        Self {
            lang: Some(lang.to_string()),
            extra: Map::new(),
        }
    }
}

/// A live UI instance holding a template
pub trait TemplateHandle {
    fn template(&self) -> Template;

    fn options(&self) -> UiOptions;

    /// Input records, for instances that collect them
    fn inputs(&self) -> Option<Vec<Inputs>> {
        None
    }

    fn update_template(&self, template: Template);
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write<T>(lock: &RwLock<T>, value: T) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
}

/// Template editor
#[derive(Debug)]
pub struct Designer {
    template: RwLock<Template>,
    options: UiOptions,
}

impl Designer {
    pub fn new(template: Template, options: UiOptions) -> Self {
        Self {
            template: RwLock::new(template),
            options,
        }
    }
}

impl TemplateHandle for Designer {
    fn template(&self) -> Template {
        read(&self.template)
    }

    fn options(&self) -> UiOptions {
        self.options.clone()
    }

    fn update_template(&self, template: Template) {
        write(&self.template, template);
    }
}

/// Fill-in form over a template
#[derive(Debug)]
pub struct Form {
    template: RwLock<Template>,
    inputs: RwLock<Vec<Inputs>>,
    options: UiOptions,
}

impl Form {
    pub fn new(template: Template, inputs: Vec<Inputs>, options: UiOptions) -> Self {
        Self {
            template: RwLock::new(template),
            inputs: RwLock::new(inputs),
            options,
        }
    }

    pub fn set_inputs(&self, inputs: Vec<Inputs>) {
        write(&self.inputs, inputs);
    }
}

impl TemplateHandle for Form {
    fn template(&self) -> Template {
        read(&self.template)
    }

    fn options(&self) -> UiOptions {
        self.options.clone()
    }

    fn inputs(&self) -> Option<Vec<Inputs>> {
        Some(read(&self.inputs))
    }

    fn update_template(&self, template: Template) {
        write(&self.template, template);
    }
}

/// Read-only preview of a filled template
#[derive(Debug)]
pub struct Viewer {
    template: RwLock<Template>,
    inputs: Vec<Inputs>,
    options: UiOptions,
}

impl Viewer {
    pub fn new(template: Template, inputs: Vec<Inputs>, options: UiOptions) -> Self {
        Self {
            template: RwLock::new(template),
            inputs,
            options,
        }
    }
}

impl TemplateHandle for Viewer {
    fn template(&self) -> Template {
        read(&self.template)
    }

    fn options(&self) -> UiOptions {
        self.options.clone()
    }

    fn inputs(&self) -> Option<Vec<Inputs>> {
        Some(self.inputs.clone())
    }

    fn update_template(&self, template: Template) {
        write(&self.template, template);
    }
}
