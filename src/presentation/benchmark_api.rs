use gloo::events::EventListener;
use js_sys::Promise;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Document, HtmlElement};

use crate::application::{BenchConfig, RunBenchmarksUseCase, RunLock, SessionRefreshRate, default_catalog};
use crate::domain::benchmark::SuiteReport;
use crate::domain::errors::{BenchError, BenchResult};
use crate::domain::logging::LogComponent;
use crate::infrastructure::ui::STATUS_ELEMENT_ID;
use crate::infrastructure::{AnimationFrameSource, BrowserImageLoader, CanvasSurface, DomReporter};
use crate::{log_error, log_info};

const COMPONENT: LogComponent = LogComponent::Presentation("BenchmarkPage");
const START_BUTTON_ID: &str = "start-button";

impl From<BenchError> for JsValue {
    fn from(error: BenchError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

fn document() -> BenchResult<Document> {
    web_sys::window()
        .ok_or_else(|| BenchError::BrowserApi("Window not available".to_string()))?
        .document()
        .ok_or_else(|| BenchError::BrowserApi("Document not available".to_string()))
}

/// Look up `id`, creating a `tag` element with `text` at the end of the body
/// when the page does not provide one.
fn ensure_element(document: &Document, id: &str, tag: &str, text: &str) -> BenchResult<HtmlElement> {
    let element = match document.get_element_by_id(id) {
        Some(element) => element,
        None => {
            let element = document
                .create_element(tag)
                .map_err(|e| BenchError::BrowserApi(format!("create {tag}: {e:?}")))?;
            element.set_id(id);
            element.set_text_content(Some(text));
            document
                .body()
                .ok_or_else(|| BenchError::BrowserApi("Document has no body".to_string()))?
                .append_child(&element)
                .map_err(|e| BenchError::BrowserApi(format!("append {id}: {e:?}")))?;
            element
        }
    };
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| BenchError::BrowserApi(format!("#{id} is not an HTML element")))
}

/// One benchmark page: a canvas, its configuration and the session refresh rate.
#[wasm_bindgen]
pub struct BenchmarkPage {
    config: BenchConfig,
    surface: Rc<CanvasSurface>,
    session: Rc<SessionRefreshRate>,
    lock: RunLock,
}

impl BenchmarkPage {
    fn create(config_json: Option<String>) -> BenchResult<Self> {
        let config = match config_json {
            Some(json) => BenchConfig::from_json(&json)?,
            None => BenchConfig::default(),
        };
        let surface = CanvasSurface::create(&document()?, config.canvas_width, config.canvas_height)?;
        Ok(Self {
            config,
            surface: Rc::new(surface),
            session: Rc::new(SessionRefreshRate::new()),
            lock: RunLock::new(),
        })
    }

    /// Everything one run needs, detached from `&self` so it can outlive the call.
    ///
    /// The lock is taken when the future first runs, not when it is built, so
    /// the button armed by `mount` and `runBenchmarks` share one gate.
    fn run_future(&self) -> impl std::future::Future<Output = BenchResult<SuiteReport>> + 'static {
        let config = self.config.clone();
        let surface = Rc::clone(&self.surface);
        let session = Rc::clone(&self.session);
        let lock = self.lock.clone();
        async move {
            let _permit = lock.try_acquire()?;
            let document = document()?;
            let images = BrowserImageLoader::new(document.clone(), config.image_url.clone());
            let frames = AnimationFrameSource::new()?;
            let mut reporter = DomReporter::new(document)?;
            let use_case = RunBenchmarksUseCase::new(surface, images, frames, config);
            let result = use_case.execute(&default_catalog(), &session, &mut reporter).await;
            if let Err(e) = &result {
                reporter.set_status(&format!("Failed: {e}"));
            }
            result
        }
    }
}

#[wasm_bindgen]
impl BenchmarkPage {
    /// Create the canvas. `config_json` may override any `BenchConfig` field.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<BenchmarkPage, JsValue> {
        Ok(Self::create(config_json)?)
    }

    /// Wire the start button: one click hides it and runs the whole suite.
    pub fn mount(&self) -> Result<(), JsValue> {
        let document = document()?;
        ensure_element(&document, STATUS_ELEMENT_ID, "div", "Press start to run the benchmark.")?;
        let button = ensure_element(&document, START_BUTTON_ID, "button", "Start")?;

        let run = self.run_future();
        let target = button.clone();
        EventListener::once(&button, "click", move |_| {
            let _ = target.style().set_property("display", "none");
            spawn_local(async move {
                match run.await {
                    Ok(report) => {
                        log_info!(COMPONENT, "finished {} sets at {}fps", report.sets.len(), report.fps);
                    }
                    Err(e) => {
                        log_error!(COMPONENT, "benchmark failed: {}", e);
                    }
                }
            });
        })
        .forget();
        Ok(())
    }

    /// Run the suite now and resolve with the report as JSON. Rejects while
    /// another run is in flight on this page.
    #[wasm_bindgen(js_name = runBenchmarks)]
    pub fn run_benchmarks(&self) -> Promise {
        let run = self.run_future();
        future_to_promise(async move {
            let report = run.await?;
            serde_json::to_string(&report)
                .map(|json| JsValue::from_str(&json))
                .map_err(|e| JsValue::from_str(&format!("serialize report: {e}")))
        })
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.lock.is_running()
    }

    /// Refresh rate detected for this page, if a run has sampled it already.
    #[wasm_bindgen(getter, js_name = detectedFps)]
    pub fn detected_fps(&self) -> Option<u32> {
        self.session.get().map(|rate| rate.fps())
    }
}
