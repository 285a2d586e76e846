use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

use super::suite::BenchmarkSuite;
use crate::domain::benchmark::{DrawingSurface, ImageSource, Workload, WorkloadSet};
use crate::domain::errors::{BenchError, BenchResult};
use crate::domain::logging::LogComponent;
use crate::log_debug;

const COMPONENT: LogComponent = LogComponent::Application("Catalog");

const SHAPE_COUNTS: [u32; 6] = [1000, 2000, 3000, 5000, 7000, 9000];
const TEXT_COUNTS: [u32; 6] = [500, 1000, 1500, 2000, 2500, 3000];
const SQUARE_SIZES: [u32; 6] = [1, 16, 128, 256, 512, 1024];

pub const ALPHABET_TEXT: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const JAPANESE_EMOJI_TEXT: &str = "あいうえおカキクケコ日本語漢字🐱🐶🦜🐻🦈";

/// A drawing primitive with its fixed parameters. The repetition count is
/// supplied per invocation by the harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    FillRect { size_px: f64 },
    FillCircle { diameter_px: f64 },
    FillPath { anchors: usize, size_px: f64 },
    Text { font_px: u32, text: String },
    Image { source_px: u32, draw_px: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDescriptor {
    pub name: String,
    pub primitive: Primitive,
}

impl EntryDescriptor {
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self { name: name.into(), primitive }
    }
}

/// Declarative form of a workload set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDescriptor {
    pub title: String,
    pub unit_label: String,
    pub repetition_counts: Vec<u32>,
    pub entries: Vec<EntryDescriptor>,
}

impl SetDescriptor {
    fn new(title: &str, unit_label: &str, counts: &[u32], entries: Vec<EntryDescriptor>) -> Self {
        Self {
            title: title.to_string(),
            unit_label: unit_label.to_string(),
            repetition_counts: counts.to_vec(),
            entries,
        }
    }

    /// Source sizes of every image entry, in declaration order.
    fn image_sizes(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().filter_map(|entry| match entry.primitive {
            Primitive::Image { source_px, .. } => Some(source_px),
            _ => None,
        })
    }
}

fn square_name(px: u32) -> String {
    format!("{px}x{px}")
}

fn square_entries(make: impl Fn(f64) -> Primitive) -> Vec<EntryDescriptor> {
    SQUARE_SIZES
        .iter()
        .map(|&px| EntryDescriptor::new(square_name(px), make(px as f64)))
        .collect()
}

fn text_entries(font_sizes: &[u32], text: &str) -> Vec<EntryDescriptor> {
    font_sizes
        .iter()
        .map(|&font_px| {
            EntryDescriptor::new(format!("{font_px}px"), Primitive::Text { font_px, text: text.to_string() })
        })
        .collect()
}

/// The standard suite: rects, circles, paths, text and image blits.
pub fn default_catalog() -> Vec<SetDescriptor> {
    let repeated_a = |chars: usize| EntryDescriptor::new(
        format!("{chars}chars"),
        Primitive::Text { font_px: 16, text: "あ".repeat(chars) },
    );

    vec![
        SetDescriptor::new(
            "fillRect",
            "rect size(px)",
            &SHAPE_COUNTS,
            square_entries(|size_px| Primitive::FillRect { size_px }),
        ),
        SetDescriptor::new(
            "fillCircle",
            "radius(px)",
            &SHAPE_COUNTS,
            square_entries(|diameter_px| Primitive::FillCircle { diameter_px }),
        ),
        SetDescriptor::new(
            "fillPath (10 anchor points)",
            "dest size(px)",
            &SHAPE_COUNTS,
            square_entries(|size_px| Primitive::FillPath { anchors: 10, size_px }),
        ),
        SetDescriptor::new(
            "fillPath (120 anchor points)",
            "dest size(px)",
            &SHAPE_COUNTS,
            square_entries(|size_px| Primitive::FillPath { anchors: 120, size_px }),
        ),
        SetDescriptor::new(
            "drawText (alpabet / 62chars)",
            "font size(px)",
            &TEXT_COUNTS,
            text_entries(&[1, 16, 64, 256], ALPHABET_TEXT),
        ),
        SetDescriptor::new(
            "drawText (Japanese & emoji / 20chars)",
            "font size(px)",
            &TEXT_COUNTS,
            text_entries(&[1, 16, 64, 256], JAPANESE_EMOJI_TEXT),
        ),
        SetDescriptor::new(
            "drawText (Japanese 'あ' / 16px)",
            "font size(px)",
            &TEXT_COUNTS,
            [1, 64, 128, 256, 512].into_iter().map(repeated_a).collect(),
        ),
        SetDescriptor::new(
            "drawImg with src size",
            "source size(px)",
            &SHAPE_COUNTS,
            [1, 16, 128, 1024, 4096]
                .into_iter()
                .map(|source_px| {
                    EntryDescriptor::new(square_name(source_px), Primitive::Image { source_px, draw_px: 100.0 })
                })
                .collect(),
        ),
        SetDescriptor::new(
            "drawImg with draw size",
            "dest size(px)",
            &SHAPE_COUNTS,
            square_entries(|draw_px| Primitive::Image { source_px: 1024, draw_px }),
        ),
    ]
}

/// Turn descriptors into runnable workload sets.
///
/// Every distinct image size is loaded once, before any set is built, so a
/// missing 2D context fails the whole preparation up front.
pub async fn bind_suite<S, L>(descriptors: &[SetDescriptor], surface: Rc<S>, images: &L) -> BenchResult<BenchmarkSuite>
where
    S: DrawingSurface + 'static,
    S::Path: 'static,
    S::Image: 'static,
    L: ImageSource<Image = S::Image> + ?Sized,
{
    let mut loaded: HashMap<u32, Rc<S::Image>> = HashMap::new();
    for size in descriptors.iter().flat_map(SetDescriptor::image_sizes) {
        if !loaded.contains_key(&size) {
            let image = images.load_resized(size).await?;
            log_debug!(COMPONENT, "prepared {} image", square_name(size));
            loaded.insert(size, Rc::new(image));
        }
    }

    let mut sets = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let mut set = WorkloadSet::new(
            descriptor.title.clone(),
            descriptor.unit_label.clone(),
            descriptor.repetition_counts.clone(),
        )?;
        for entry in &descriptor.entries {
            let workload = bind_entry(entry, &surface, &loaded)?;
            set.add_workload(workload)?;
        }
        sets.push(set);
    }
    Ok(BenchmarkSuite::new(sets))
}

fn bind_entry<S>(
    entry: &EntryDescriptor,
    surface: &Rc<S>,
    images: &HashMap<u32, Rc<S::Image>>,
) -> BenchResult<Workload>
where
    S: DrawingSurface + 'static,
    S::Path: 'static,
    S::Image: 'static,
{
    let surface = Rc::clone(surface);
    let workload = match &entry.primitive {
        Primitive::FillRect { size_px } => {
            let size_px = *size_px;
            Workload::new(&entry.name, move |count| surface.fill_rects(size_px, count))
        }
        Primitive::FillCircle { diameter_px } => {
            let diameter_px = *diameter_px;
            Workload::new(&entry.name, move |count| surface.fill_circles(diameter_px, count))
        }
        Primitive::FillPath { anchors, size_px } => {
            let path = surface.prepare_path(*anchors, *size_px)?;
            Workload::new(&entry.name, move |count| surface.fill_path(&path, count))
        }
        Primitive::Text { font_px, text } => {
            let font_px = *font_px;
            let text = text.clone();
            Workload::new(&entry.name, move |count| surface.draw_text(font_px, &text, count))
        }
        Primitive::Image { source_px, draw_px } => {
            let image = images.get(source_px).cloned().ok_or_else(|| {
                BenchError::ImageLoadFailed(format!("{} image was not prepared", square_name(*source_px)))
            })?;
            let draw_px = *draw_px;
            Workload::new(&entry.name, move |count| surface.draw_images(&image, draw_px, count))
        }
    };
    Ok(workload)
}
