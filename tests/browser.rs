#![cfg(target_arch = "wasm32")]

use canvas_bench_wasm::application::FrameRateDetector;
use canvas_bench_wasm::domain::benchmark::{
    CellResult, DrawingSurface, FrameSource, PreparedPath, ProgressReporter, SampleOutcome, WorkloadSet,
};
use canvas_bench_wasm::infrastructure::ui::STATUS_ELEMENT_ID;
use canvas_bench_wasm::infrastructure::{AnimationFrameSource, CanvasSurface, DomReporter};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlDetailsElement, HtmlImageElement};

wasm_bindgen_test_configure!(run_in_browser);

fn surface(width: u32, height: u32) -> CanvasSurface {
    let document = web_sys::window().unwrap().document().unwrap();
    CanvasSurface::create(&document, width, height).unwrap()
}

#[wasm_bindgen_test]
async fn animation_frames_advance_the_clock() {
    let frames = AnimationFrameSource::new().unwrap();
    let start = frames.now();
    frames.next_frame().await;
    frames.next_frame().await;
    assert!(frames.now() > start);
}

#[wasm_bindgen_test]
async fn sleep_waits_at_least_the_delay() {
    let frames = AnimationFrameSource::new().unwrap();
    let start = frames.now();
    frames.sleep(50).await;
    assert!(frames.now() - start >= 45.0);
}

#[wasm_bindgen_test]
async fn detects_a_positive_refresh_rate() {
    let frames = AnimationFrameSource::new().unwrap();
    let rate = FrameRateDetector::new(250.0).detect(&frames).await;
    assert!(rate.fps() > 0);
}

#[wasm_bindgen_test]
fn canvas_is_shown_at_half_size() {
    let surface = surface(200, 100);
    assert_eq!(surface.dimensions(), (200, 100));
    assert_eq!(surface.canvas().style().get_property_value("width").unwrap(), "100px");
}

#[wasm_bindgen_test]
fn primitives_draw_without_errors() {
    let surface = surface(64, 64);
    surface.fill_rects(4.0, 10);
    surface.fill_circles(4.0, 10);
    let path = surface.prepare_path(10, 16.0).unwrap();
    assert_eq!(path.anchor_count(), 10);
    surface.fill_path(&path, 10);
    surface.draw_text(16, "abc", 10);
    let image = HtmlImageElement::new_with_width_and_height(4, 4).unwrap();
    surface.draw_images(&image, 32.0, 10);
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn status_text(document: &Document) -> String {
    let status = match document.get_element_by_id(STATUS_ELEMENT_ID) {
        Some(status) => status,
        None => {
            let status = document.create_element("div").unwrap();
            status.set_id(STATUS_ELEMENT_ID);
            document.body().unwrap().append_child(&status).unwrap();
            status
        }
    };
    status.text_content().unwrap_or_default()
}

fn all_details(document: &Document) -> Vec<HtmlDetailsElement> {
    let nodes = document.query_selector_all("details").unwrap();
    (0..nodes.length())
        .map(|i| nodes.get(i).unwrap().dyn_into::<HtmlDetailsElement>().unwrap())
        .collect()
}

/// `(text, has "dropped" class)` of every span under `row`.
fn spans(row: &Element) -> Vec<(String, bool)> {
    let nodes = row.query_selector_all("span").unwrap();
    (0..nodes.length())
        .map(|i| {
            let span = nodes.get(i).unwrap().dyn_into::<Element>().unwrap();
            (span.text_content().unwrap_or_default(), span.class_list().contains("dropped"))
        })
        .collect()
}

fn cell(workload: &str, repetitions: u32, outcome: SampleOutcome) -> CellResult {
    CellResult::new(workload, repetitions, outcome)
}

#[wasm_bindgen_test]
fn dom_reporter_renders_results_table() {
    let document = document();
    status_text(&document);
    let mut reporter = DomReporter::new(document.clone()).unwrap();
    let rects = WorkloadSet::new("fillRect", "rect size(px)", vec![1000, 2000, 3000])
        .unwrap()
        .with_workload("1x1", |_| {})
        .unwrap()
        .with_workload("1024x1024", |_| {})
        .unwrap();

    reporter.suite_progress(1, 2, "fillRect");
    assert_eq!(status_text(&document), "Running: 1/2. fillRect");

    reporter.set_started(&rects);
    for result in [
        cell("1x1", 1000, SampleOutcome::Completed { elapsed_ms: 900.0, dropped: false }),
        cell("1x1", 2000, SampleOutcome::Completed { elapsed_ms: 1200.0, dropped: true }),
        cell("1x1", 3000, SampleOutcome::Completed { elapsed_ms: 1500.0, dropped: true }),
        cell("1024x1024", 1000, SampleOutcome::Completed { elapsed_ms: 2000.0, dropped: true }),
        cell("1024x1024", 2000, SampleOutcome::TimedOut { elapsed_ms: 4500.0 }),
        cell("1024x1024", 3000, SampleOutcome::Skipped),
    ] {
        reporter.cell_completed(&result);
    }

    let table = all_details(&document).pop().unwrap();
    assert!(table.open());
    let summary = table.query_selector("summary").unwrap().unwrap();
    assert_eq!(summary.text_content().unwrap(), "fillRect");

    let head = table.query_selector(".result-head-row").unwrap().unwrap();
    let head: Vec<String> = spans(&head).into_iter().map(|(text, _)| text).collect();
    assert_eq!(head, vec!["rect size(px)", "1000ops/fr", "2000ops/fr", "3000ops/fr"]);

    let rows = table.query_selector_all(".result-row").unwrap();
    assert_eq!(rows.length(), 2);
    let row = |i| spans(&rows.get(i).unwrap().dyn_into::<Element>().unwrap());
    assert_eq!(
        row(0),
        vec![
            ("1x1".to_string(), false),
            ("900.00ms".to_string(), false),
            ("1200.00ms".to_string(), true),
            ("1500.00ms".to_string(), true),
        ]
    );
    assert_eq!(
        row(1),
        vec![
            ("1024x1024".to_string(), false),
            ("2000.00ms".to_string(), true),
            ("(skipped)".to_string(), true),
            ("(skipped)".to_string(), true),
        ]
    );

    let arcs = WorkloadSet::new("fillCircle", "radius(px)", vec![1000]).unwrap();
    reporter.suite_progress(2, 2, "fillCircle");
    reporter.set_started(&arcs);
    let details = all_details(&document);
    let (newest, older) = details.split_last().unwrap();
    assert!(newest.open());
    assert!(older.iter().all(|d| !d.open()));

    // Rows of the new set go to its own table, never the previous one.
    reporter.cell_completed(&cell("r1", 1000, SampleOutcome::Completed { elapsed_ms: 10.0, dropped: false }));
    assert_eq!(newest.query_selector_all(".result-row").unwrap().length(), 1);
    assert_eq!(table.query_selector_all(".result-row").unwrap().length(), 2);

    reporter.suite_finished();
    assert_eq!(status_text(&document), "All test done.");
}
