use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{error, info};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;

use crate::engine::{Background, Object3D, SceneGraph, TextureHandle, TextureSettings};
use crate::loaders::{load_gltf_file, load_obj, TextureLoader};
use crate::math::Transform;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// Wavefront OBJ with its material library
    Obj { obj: PathBuf, mtl: PathBuf },
    Gltf(PathBuf),
}

impl ModelSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::Obj { obj, .. } => obj,
            Self::Gltf(path) => path,
        }
    }
}

/// A model to load and where to put it
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub name: String,
    pub source: ModelSource,
    pub transform: Transform,
}

struct ModelResult {
    name: String,
    result: Result<Object3D>,
}

/// Loads models off the render thread and hands them over between frames
///
/// Finished models are inserted straight into the scene graph by `poll`, so
/// they are drawn but never animated. A failed load is logged and the rest of
/// the scene carries on without it.
pub struct AssetLoader {
    textures: TextureLoader,
    completed_tx: Sender<ModelResult>,
    completed_rx: Receiver<ModelResult>,
    pending: usize,
}

impl AssetLoader {
    pub fn new() -> Result<Self> {
        let (completed_tx, completed_rx) = unbounded();
        Ok(Self {
            textures: TextureLoader::new()?,
            completed_tx,
            completed_rx,
            pending: 0,
        })
    }

    pub fn textures(&self) -> &TextureLoader {
        &self.textures
    }

    pub fn load_texture(&self, path: impl AsRef<Path>, settings: TextureSettings) -> TextureHandle {
        self.textures.load(path, settings)
    }

    /// Install an equirectangular panorama as the scene background
    pub fn load_background(&self, path: impl AsRef<Path>, scene: &mut SceneGraph) -> TextureHandle {
        let handle = self.textures.load(path, TextureSettings::equirectangular());
        scene.set_background(Background::Texture(handle.clone()));
        handle
    }

    pub fn load_model(&mut self, request: ModelRequest) -> Result<()> {
        let textures = self.textures.clone();
        let ModelRequest { name, source, transform } = request;
        self.spawn_load(name, transform, move || load_source(&source, &textures))
    }

    fn spawn_load<F>(&mut self, name: String, transform: Transform, load: F) -> Result<()>
    where
        F: FnOnce() -> Result<Object3D> + Send + 'static,
    {
        let sender = self.completed_tx.clone();
        let thread_name = format!("model-{}", name);
        thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                // a panicking decoder still has to report, or `pending` never drains
                let result = panic::catch_unwind(AssertUnwindSafe(load))
                    .unwrap_or_else(|payload| Err(anyhow!("loader panicked: {}", panic_message(&*payload))))
                    .map(|mut object| {
                        object.transform = transform;
                        object.named(name.clone())
                    });
                // receiver gone means the app is shutting down
                let _ = sender.send(ModelResult { name, result });
            })
            .context("failed to spawn model loader thread")?;
        self.pending += 1;
        Ok(())
    }

    /// Loads still in flight
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Move finished models into `scene`. Returns how many were added.
    pub fn poll(&mut self, scene: &mut SceneGraph) -> usize {
        let mut added = 0;
        while let Ok(ModelResult { name, result }) = self.completed_rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match result {
                Ok(object) => {
                    scene.add(object);
                    info!("model {} loaded", name);
                    added += 1;
                }
                Err(e) => error!("model {} failed to load: {:#}", name, e),
            }
        }
        added
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown cause"
    }
}

fn load_source(source: &ModelSource, textures: &TextureLoader) -> Result<Object3D> {
    match source {
        ModelSource::Obj { obj, mtl } => load_obj(obj, mtl, textures),
        ModelSource::Gltf(path) => load_gltf_file(path),
    }
}
