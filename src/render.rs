// src/render.rs
use askama::Template;

use crate::controller::FormController;
use crate::errors::Result;
use crate::markdown;
use crate::models::{EvaluationResult, Field};

pub const SUBMIT_LABEL: &str = "Evaluate Models";
pub const LOADING_LABEL: &str = "Evaluating...";

pub struct FieldView<'a> {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: &'a str,
}

pub struct MetadataRow {
    pub label: &'static str,
    pub value: String,
}

/// The evaluation form page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct FormPage<'a> {
    pub fields: Vec<FieldView<'a>>,
    pub loading: bool,
    pub button_label: &'static str,
    pub refresh_secs: u64,
    pub notice: Option<String>,
    pub error: Option<&'a str>,
    pub raw_json: Option<String>,
    pub analysis_html: Option<String>,
    pub metadata: Option<Vec<MetadataRow>>,
}

impl<'a> FormPage<'a> {
    /// Builds the page for the controller's current state.
    pub fn new(controller: &'a FormController, refresh_secs: u64) -> Self {
        let input = controller.input();
        let fields = Field::ALL
            .into_iter()
            .map(|field| FieldView {
                name: field.name(),
                label: field.label(),
                placeholder: field.placeholder(),
                value: input.get(field),
            })
            .collect();

        let loading = controller.is_loading();
        let mut page = FormPage {
            fields,
            loading,
            button_label: if loading { LOADING_LABEL } else { SUBMIT_LABEL },
            refresh_secs,
            notice: None,
            error: controller.error(),
            raw_json: None,
            analysis_html: None,
            metadata: None,
        };

        match controller.result() {
            Some(EvaluationResult::Raw(value)) => {
                page.raw_json = Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
            }
            Some(EvaluationResult::Structured(structured)) => {
                page.analysis_html = Some(markdown::to_html(&structured.analysis));
                page.metadata = structured.metadata.as_ref().map(|metadata| {
                    metadata
                        .rows()
                        .into_iter()
                        .map(|(label, value)| MetadataRow { label, value })
                        .collect()
                });
            }
            None => {}
        }

        page
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Renders the full page. Pure function of the controller state.
pub fn render(controller: &FormController, refresh_secs: u64) -> Result<String> {
    Ok(FormPage::new(controller, refresh_secs).render()?)
}
