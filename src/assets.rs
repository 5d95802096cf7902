//! Component graphics: where they come from and how they load.
//!
//! Each kind loads once, on a single-threaded [`LocalPool`] that the frame loop
//! drives with [`AssetLoader::poll`]. A load moves `Loading -> Loaded | Failed`
//! and never blocks creation of the nodes that use it.

use egui::{ColorImage, Vec2};
use futures::channel::mpsc;
use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use log::{error, info};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

use crate::element::ComponentKind;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse SVG for {kind}: {source}")]
    Parse {
        kind: ComponentKind,
        source: usvg::Error,
    },

    #[error("Graphic for {0} has no area")]
    EmptyGraphic(ComponentKind),

    #[error("Failed to allocate a {0}x{1} raster")]
    Raster(u32, u32),

    #[error("Failed to schedule load: {0}")]
    Spawn(#[from] futures::task::SpawnError),
}

/// Resolves a component kind to the bytes of its SVG graphic
pub trait AssetSource {
    fn fetch(&self, kind: ComponentKind) -> Result<Vec<u8>, AssetError>;
}

/// Graphics compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledAssets;

impl AssetSource for BundledAssets {
    fn fetch(&self, kind: ComponentKind) -> Result<Vec<u8>, AssetError> {
        let bytes: &[u8] = match kind {
            ComponentKind::ConductorCasing => include_bytes!("../assets/ConductorCasing.svg"),
            ComponentKind::FormationNormal => include_bytes!("../assets/FormationNormal.svg"),
            ComponentKind::OpenHole => include_bytes!("../assets/OpenHole.svg"),
            ComponentKind::ProductionCasing => include_bytes!("../assets/ProductionCasing.svg"),
            ComponentKind::ReservoirLayer => include_bytes!("../assets/ReservoirLayer.svg"),
            ComponentKind::Seawater => include_bytes!("../assets/Seawater.svg"),
            ComponentKind::SurfaceCasing => include_bytes!("../assets/SurfaceCasing.svg"),
            ComponentKind::Rig => include_bytes!("../assets/Rig.svg"),
            ComponentKind::DashedLine => include_bytes!("../assets/DashedLine.svg"),
            ComponentKind::SolidLine => include_bytes!("../assets/SolidLine.svg"),
        };
        Ok(bytes.to_vec())
    }
}

/// Graphics read from `<root>/<Type>.svg`
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, kind: ComponentKind) -> PathBuf {
        self.root.join(kind.asset_file_name())
    }
}

impl AssetSource for DirectoryAssets {
    fn fetch(&self, kind: ComponentKind) -> Result<Vec<u8>, AssetError> {
        let path = self.path_for(kind);
        std::fs::read(&path).map_err(|source| AssetError::Read { path, source })
    }
}

/// A parsed component graphic
pub struct SvgGraphic {
    kind: ComponentKind,
    tree: usvg::Tree,
}

// Custom Debug implementation since the tree is large
impl std::fmt::Debug for SvgGraphic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgGraphic")
            .field("kind", &self.kind)
            .field("natural_size", &self.natural_size())
            .finish()
    }
}

impl SvgGraphic {
    pub fn parse(kind: ComponentKind, bytes: &[u8]) -> Result<Self, AssetError> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
            .map_err(|source| AssetError::Parse { kind, source })?;
        let graphic = Self { kind, tree };
        let size = graphic.natural_size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(AssetError::EmptyGraphic(kind));
        }
        Ok(graphic)
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn tree(&self) -> &usvg::Tree {
        &self.tree
    }

    /// Intrinsic width and height declared by the SVG
    pub fn natural_size(&self) -> Vec2 {
        let size = self.tree.size();
        Vec2::new(size.width(), size.height())
    }

    /// Renders the graphic stretched to `[width, height]` pixels
    pub fn rasterize(&self, pixels: [u32; 2]) -> Result<ColorImage, AssetError> {
        let [width, height] = [pixels[0].max(1), pixels[1].max(1)];
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(AssetError::Raster(width, height))?;

        let natural = self.natural_size();
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / natural.x,
            height as f32 / natural.y,
        );
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());

        Ok(ColorImage::from_rgba_premultiplied(
            [width as usize, height as usize],
            pixmap.data(),
        ))
    }
}

/// Load progress of one kind's graphic
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Rc<SvgGraphic>),
    Failed(String),
}

impl LoadState {
    pub fn graphic(&self) -> Option<&Rc<SvgGraphic>> {
        match self {
            LoadState::Loaded(graphic) => Some(graphic),
            _ => None,
        }
    }
}

/// A load that finished during the last [`AssetLoader::poll`]
#[derive(Debug, Clone)]
pub enum AssetCompletion {
    Loaded { kind: ComponentKind, natural_size: Vec2 },
    Failed { kind: ComponentKind, reason: String },
}

type LoadResult = (ComponentKind, Result<SvgGraphic, AssetError>);

pub struct AssetLoader {
    source: Rc<dyn AssetSource>,
    pool: LocalPool,
    spawner: LocalSpawner,
    states: HashMap<ComponentKind, LoadState>,
    done_tx: mpsc::UnboundedSender<LoadResult>,
    done_rx: mpsc::UnboundedReceiver<LoadResult>,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("states", &self.states)
            .finish_non_exhaustive()
    }
}

impl AssetLoader {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        let (done_tx, done_rx) = mpsc::unbounded();
        Self {
            source: Rc::new(source),
            pool,
            spawner,
            states: HashMap::new(),
            done_tx,
            done_rx,
        }
    }

    /// Starts loading `kind` unless it was already requested
    pub fn request(&mut self, kind: ComponentKind) {
        if self.states.contains_key(&kind) {
            return;
        }
        self.states.insert(kind, LoadState::Loading);

        let source = Rc::clone(&self.source);
        let done = self.done_tx.clone();
        let task = async move {
            let result = source
                .fetch(kind)
                .and_then(|bytes| SvgGraphic::parse(kind, &bytes));
            // The receiver lives as long as the loader
            let _ = done.unbounded_send((kind, result));
        };

        if let Err(err) = self.spawner.spawn_local(task) {
            self.fail(kind, AssetError::from(err));
        }
    }

    pub fn state(&self, kind: ComponentKind) -> Option<&LoadState> {
        self.states.get(&kind)
    }

    pub fn graphic(&self, kind: ComponentKind) -> Option<&Rc<SvgGraphic>> {
        self.states.get(&kind).and_then(LoadState::graphic)
    }

    /// True while any requested graphic is still loading
    pub fn is_loading(&self) -> bool {
        self.states.values().any(|state| matches!(state, LoadState::Loading))
    }

    /// Runs pending loads as far as they go and reports what finished
    pub fn poll(&mut self) -> Vec<AssetCompletion> {
        self.pool.run_until_stalled();

        let mut completions = Vec::new();
        while let Ok(Some((kind, result))) = self.done_rx.try_next() {
            match result {
                Ok(graphic) => {
                    let natural_size = graphic.natural_size();
                    info!("🖼️ Loaded graphic for {}: {}x{}", kind, natural_size.x, natural_size.y);
                    self.states.insert(kind, LoadState::Loaded(Rc::new(graphic)));
                    completions.push(AssetCompletion::Loaded { kind, natural_size });
                }
                Err(err) => {
                    completions.push(AssetCompletion::Failed {
                        kind,
                        reason: err.to_string(),
                    });
                    self.fail(kind, err);
                }
            }
        }
        completions
    }

    fn fail(&mut self, kind: ComponentKind, err: AssetError) {
        error!("❌ Failed to load graphic for {}: {}", kind, err);
        self.states.insert(kind, LoadState::Failed(err.to_string()));
    }
}
