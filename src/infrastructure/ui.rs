//! Results table rendering. Kept separate from the harness: the harness only
//! hands over finished cells.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlDetailsElement};

use crate::domain::benchmark::{CellResult, ProgressReporter, WorkloadSet};
use crate::domain::errors::{BenchError, BenchResult};
use crate::domain::logging::{LogComponent, get_logger};

pub const STATUS_ELEMENT_ID: &str = "status-text";
const DROPPED_CLASS: &str = "dropped";

/// Writes progress into `#status-text` and one `<details>` table per set.
pub struct DomReporter {
    document: Document,
    container: Element,
    table: Option<Element>,
    row: Option<(String, Element)>,
}

impl DomReporter {
    pub fn new(document: Document) -> BenchResult<Self> {
        let container: Element = document
            .body()
            .ok_or_else(|| BenchError::BrowserApi("Document has no body".to_string()))?
            .into();
        Ok(Self { document, container, table: None, row: None })
    }

    pub fn set_status(&self, text: &str) {
        match self.document.get_element_by_id(STATUS_ELEMENT_ID) {
            Some(element) => element.set_text_content(Some(text)),
            None => get_logger().debug(
                LogComponent::Infrastructure("UI"),
                "Status element 'status-text' not found (optional)",
            ),
        }
    }

    fn element(&self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn span(&self, text: &str) -> Option<Element> {
        let span = self.element("span")?;
        span.set_text_content(Some(text));
        Some(span)
    }

    fn row_element(&self, class: &str) -> Option<Element> {
        let row = self.element("div")?;
        let _ = row.class_list().add_1(class);
        Some(row)
    }

    /// Collapse every `<details>` but the most recent one.
    fn open_last_details(&self) {
        let Ok(details) = self.document.query_selector_all("details") else {
            return;
        };
        let last = details.length().checked_sub(1);
        for i in 0..details.length() {
            if let Some(node) = details.get(i) {
                if let Ok(element) = node.dyn_into::<HtmlDetailsElement>() {
                    element.set_open(Some(i) == last);
                }
            }
        }
    }

    fn start_row(&mut self, workload: &str) -> Option<Element> {
        let table = self.table.as_ref()?;
        let row = self.row_element("result-row")?;
        let title = self.span(workload)?;
        let _ = row.append_child(&title);
        let _ = table.append_child(&row);
        self.row = Some((workload.to_string(), row.clone()));
        Some(row)
    }
}

impl ProgressReporter for DomReporter {
    fn suite_progress(&mut self, index: usize, total: usize, title: &str) {
        self.set_status(&format!("Running: {index}/{total}. {title}"));
    }

    fn set_started(&mut self, set: &WorkloadSet) {
        self.row = None;
        self.table = None;
        let Some(details) = self.element("details") else {
            return;
        };
        if let Some(summary) = self.element("summary") {
            summary.set_text_content(Some(set.title()));
            let _ = details.append_child(&summary);
        }
        let _ = self.container.append_child(&details);
        self.open_last_details();

        if let Some(head) = self.row_element("result-head-row") {
            if let Some(cell) = self.span(set.unit_label()) {
                let _ = head.append_child(&cell);
            }
            for count in set.repetition_counts() {
                if let Some(cell) = self.span(&format!("{count}ops/fr")) {
                    let _ = head.append_child(&cell);
                }
            }
            let _ = details.append_child(&head);
        }
        self.table = Some(details);
    }

    fn cell_completed(&mut self, cell: &CellResult) {
        let current = match &self.row {
            Some((workload, row)) if *workload == cell.workload => Some(row.clone()),
            _ => None,
        };
        let row = match current {
            Some(row) => Some(row),
            None => self.start_row(&cell.workload),
        };
        let (Some(row), Some(span)) = (row, self.span(&cell.outcome.label())) else {
            return;
        };
        if cell.dropped() {
            let _ = span.class_list().add_1(DROPPED_CLASS);
        }
        let _ = row.append_child(&span);
    }

    fn suite_finished(&mut self) {
        self.set_status("All test done.");
    }
}
