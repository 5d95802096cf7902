//! Offscreen rendering of the canvas and the one-page PDF built from it.

use egui::{Pos2, Rect, Vec2};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tiny_skia::{Color, Paint, Pixmap, Transform};

use crate::assets::AssetLoader;
use crate::config::EditorConfig;
use crate::document::Schematic;
use crate::element::{PlacedComponent, LABEL_FONT_SIZE};
use crate::layer::LayerVisibility;
use crate::viewport::Viewport;

/// Landscape A4, in PDF points
pub const PAGE_WIDTH: f32 = 842.0;
pub const PAGE_HEIGHT: f32 = 595.0;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to allocate a {0}x{1} export raster")]
    Raster(u32, u32),

    #[error("Failed to encode export image: {0}")]
    Jpeg(#[from] image::ImageError),

    #[error("Failed to assemble PDF: {0}")]
    Pdf(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    /// Visible canvas size in screen points
    pub canvas_size: Vec2,
    /// Output pixels per screen point
    pub multiplier: f32,
}

impl From<&EditorConfig> for ExportSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            canvas_size: config.canvas_size,
            multiplier: config.export_multiplier,
        }
    }
}

impl ExportSettings {
    pub fn pixel_size(&self) -> [u32; 2] {
        [
            (self.canvas_size.x * self.multiplier).round().max(1.0) as u32,
            (self.canvas_size.y * self.multiplier).round().max(1.0) as u32,
        ]
    }
}

/// Draws the visible components in stacking order on white, as the canvas shows them.
/// Components whose graphic is not available draw as placeholders.
pub fn render_scene(
    schematic: &Schematic,
    layers: &LayerVisibility,
    viewport: &Viewport,
    assets: &AssetLoader,
    settings: &ExportSettings,
) -> Result<Pixmap, ExportError> {
    let [width, height] = settings.pixel_size();
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Raster(width, height))?;
    pixmap.fill(Color::WHITE);

    let mut label_options = usvg::Options::default();
    Arc::make_mut(&mut label_options.fontdb).load_system_fonts();

    let to_pixels = |p: Pos2| (viewport.to_screen(p).to_vec2() * settings.multiplier).to_pos2();

    for comp in schematic.filter_visible(layers) {
        let rect = comp.rect();
        let pixel_rect = Rect::from_min_max(to_pixels(rect.min), to_pixels(rect.max));

        match assets.graphic(comp.kind()) {
            Some(graphic) => {
                let natural = graphic.natural_size();
                let transform = Transform::from_row(
                    pixel_rect.width() / natural.x,
                    0.0,
                    0.0,
                    pixel_rect.height() / natural.y,
                    pixel_rect.min.x,
                    pixel_rect.min.y,
                );
                resvg::render(graphic.tree(), transform, &mut pixmap.as_mut());
            }
            None => draw_placeholder(&mut pixmap, pixel_rect),
        }

        let scale = viewport.scale * settings.multiplier;
        draw_label(&mut pixmap, comp, to_pixels(comp.label_anchor()), scale, &label_options);
    }

    Ok(pixmap)
}

fn draw_placeholder(pixmap: &mut Pixmap, rect: Rect) {
    let Some(area) = tiny_skia::Rect::from_xywh(rect.min.x, rect.min.y, rect.width(), rect.height())
    else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(220, 220, 220, 255);
    pixmap.fill_rect(area, &paint, Transform::identity(), None);
}

fn draw_label(
    pixmap: &mut Pixmap,
    comp: &PlacedComponent,
    anchor: Pos2,
    scale: f32,
    options: &usvg::Options,
) {
    if comp.label().trim().is_empty() {
        return;
    }
    let svg = label_svg(comp.label());
    match usvg::Tree::from_data(svg.as_bytes(), options) {
        Ok(tree) => {
            let transform = Transform::from_row(scale, 0.0, 0.0, scale, anchor.x, anchor.y);
            resvg::render(&tree, transform, &mut pixmap.as_mut());
        }
        Err(err) => debug!("Skipping label of {}: {}", comp.id(), err),
    }
}

/// A one-line SVG document holding `label` with its top-left at the origin
fn label_svg(label: &str) -> String {
    let width = (label.chars().count() as f32 * LABEL_FONT_SIZE).max(1.0);
    let height = LABEL_FONT_SIZE * 1.5;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text x="0" y="{baseline}" font-family="sans-serif" font-size="{size}" fill="black">{text}</text></svg>"#,
        baseline = LABEL_FONT_SIZE,
        size = LABEL_FONT_SIZE,
        text = escape_xml(label),
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Where the raster lands on the page, in PDF user space (origin bottom-left).
/// The whole image fits the page with its aspect ratio kept, centred.
pub fn image_placement(width: u32, height: u32) -> Rect {
    let (width, height) = (width.max(1) as f32, height.max(1) as f32);
    let fit = (PAGE_WIDTH / width).min(PAGE_HEIGHT / height);
    let size = Vec2::new(width * fit, height * fit);
    let page = Rect::from_min_size(Pos2::ZERO, Vec2::new(PAGE_WIDTH, PAGE_HEIGHT));
    Rect::from_center_size(page.center(), size)
}

/// Wraps the raster in a landscape A4 PDF, scaled to fit the page
pub fn encode_pdf(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (pixmap.width(), pixmap.height());

    // The background is opaque, so premultiplied channels are the plain ones
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
        &rgb,
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )?;

    let placement = image_placement(width, height);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        jpeg,
    )
    .with_compression(false);
    let image_id = doc.add_object(image);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    placement.width().into(),
                    0.0_f32.into(),
                    0.0_f32.into(),
                    placement.height().into(),
                    placement.min.x.into(),
                    placement.min.y.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![
            Object::from(0.0_f32),
            Object::from(0.0_f32),
            Object::from(PAGE_WIDTH),
            Object::from(PAGE_HEIGHT),
        ],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::from(page_id)],
        "Count" => 1_i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    Ok(bytes)
}

/// The user's download directory, or the working directory without one
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Renders the scene and writes it as `file_name` into `dir`
pub fn export_document(
    schematic: &Schematic,
    layers: &LayerVisibility,
    viewport: &Viewport,
    assets: &AssetLoader,
    settings: &ExportSettings,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    let pixmap = render_scene(schematic, layers, viewport, assets, settings)?;
    let pdf = encode_pdf(&pixmap)?;

    let path = dir.join(file_name);
    std::fs::write(&path, pdf).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    info!("📄 Exported schematic to {}", path.display());
    Ok(path)
}
