//! Layer infrastructure for icon synthesis.
//!
//! A master icon is built by running a fixed sequence of layers over one
//! [`Canvas`]. Each layer holds an optional configuration and an enabled flag
//! so it can be toggled without losing its settings.
//!
//! # Architecture
//!
//! Each layer config implements [`LayerEffect`], which defines:
//! - How the layer transforms the canvas
//! - What properties it emits for downstream layers
//!
//! Properties flow through the pipeline via [`RenderContext`], enabling
//! layers to communicate without tight coupling. The pipeline seeds the
//! context with the motif [`Footprint`] before any layer runs, so the effect
//! layers beneath the motif know what silhouette to shade.

pub mod glow;
pub mod gradient;
pub mod mask;
pub mod motif;
pub mod shadow;

pub use glow::{GlowConfig, render_glow};
pub use gradient::{Axis, Gradient, GradientKind, fill_linear, fill_radial};
pub use mask::{CornerRadius, IOS_CORNER_RADIUS_RATIO, MaskConfig, apply_mask, rounded_mask};
pub use motif::{Motif, MotifDrawn, MotifLayer, draw_motif};
pub use shadow::{ShadowConfig, render_shadow};

use std::any::{Any, TypeId};
use std::collections::HashMap;

use log::debug;

use crate::canvas::Canvas;
use crate::error::Result;
use crate::shape::Shape;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the rendering pipeline.
///
/// Layers can read properties set by upstream layers and emit new properties
/// for downstream layers to consume.
///
/// # Example
///
/// ```ignore
/// // Upstream code publishes the silhouette of the motif
/// ctx.set(Footprint(shape));
///
/// // The shadow layer reads it
/// if let Some(Footprint(shape)) = ctx.get::<Footprint>() {
///     // Shade beneath the shape...
/// }
/// ```
pub struct RenderContext {
    /// The canvas being built up by the pipeline.
    pub canvas: Canvas,

    /// Typed property bag for inter-layer communication.
    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RenderContext {
    /// Creates a new render context around the given base canvas.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            properties: HashMap::new(),
        }
    }

    /// Sets a typed property that downstream layers can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an upstream layer.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    /// Checks if a property has been set.
    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }
}

// ============================================================================
// Common Properties
// ============================================================================

/// The silhouette of the motif, in canvas coordinates.
///
/// Seeded by [`LayerPipeline`] from [`Motif::footprint`]. Consumed by the
/// shadow and glow layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint(pub Shape);

// ============================================================================
// Layer Traits
// ============================================================================

/// Trait for layer configurations that know how to apply themselves.
///
/// The separation of [`transform`](Self::transform) and [`emit`](Self::emit)
/// provides a canonical place for property emission and makes the data flow
/// explicit.
pub trait LayerEffect {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Transform the canvas in the render context.
    ///
    /// Implementations read any needed properties from `ctx` and modify
    /// `ctx.canvas`. Property emission happens in [`emit`](Self::emit).
    fn transform(&self, ctx: &mut RenderContext) -> Result<()>;

    /// Emit properties for downstream layers to consume.
    ///
    /// Called after a successful [`transform`](Self::transform). The default
    /// implementation emits nothing.
    fn emit(&self, _ctx: &mut RenderContext) {}
}

// ============================================================================
// Generic Layer
// ============================================================================

/// A layer slot: optional configuration plus an enabled flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<C> {
    config: Option<C>,
    enabled: bool,
}

impl<C> Default for Layer<C> {
    fn default() -> Self {
        Self {
            config: None,
            enabled: true,
        }
    }
}

impl<C> Layer<C> {
    /// A layer holding `config`, enabled.
    pub fn with_config(config: C) -> Self {
        Self {
            config: Some(config),
            enabled: true,
        }
    }

    /// Returns the current configuration, if any.
    pub fn config(&self) -> Option<&C> {
        self.config.as_ref()
    }

    /// Returns the configuration only if the layer is active.
    pub fn active_config(&self) -> Option<&C> {
        self.config.as_ref().filter(|_| self.enabled)
    }

    /// Returns true if this layer is active (has config AND is enabled).
    pub fn is_active(&self) -> bool {
        self.active_config().is_some()
    }

    /// Returns true if the layer has a configuration set.
    pub fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// Returns whether the layer is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the layer is enabled.
    ///
    /// Returns true if the enabled state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: Option<C>) {
        self.config = config;
    }
}

impl<C: LayerEffect> Layer<C> {
    /// Apply this layer to the render context.
    ///
    /// Inactive layers leave the context untouched.
    pub fn apply(&self, ctx: &mut RenderContext) -> Result<()> {
        let Some(config) = self.active_config() else {
            return Ok(());
        };
        config.transform(ctx)?;
        config.emit(ctx);
        debug!("applied {} layer", config.name());
        Ok(())
    }
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// The fixed layer stack that turns a base canvas into a master icon.
///
/// ```text
/// Base canvas (transparent, or a loaded source image)
///     │
///     ▼
/// ┌────────────┐
/// │ Background │ ◄── gradient fill
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │   Shadow   │ ◄── reads Footprint
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │    Glow    │ ◄── reads Footprint
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │   Motif    │ ◄── own layer, composited over
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │    Mask    │ ◄── applied exactly once, last
/// └────────────┘
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerPipeline {
    pub background: Layer<Gradient>,
    pub shadow: Layer<ShadowConfig>,
    pub glow: Layer<GlowConfig>,
    pub motif: Layer<MotifLayer>,
    pub mask: Layer<MaskConfig>,
}

impl LayerPipeline {
    /// Runs every active layer over `base` and returns the full context,
    /// including the properties the layers emitted.
    pub fn render_context(&self, base: Canvas) -> Result<RenderContext> {
        let mut ctx = RenderContext::new(base);
        if let Some(shape) = self.motif.active_config().and_then(|m| m.as_motif().footprint()) {
            ctx.set(Footprint(shape));
        }

        self.background.apply(&mut ctx)?;
        self.shadow.apply(&mut ctx)?;
        self.glow.apply(&mut ctx)?;
        self.motif.apply(&mut ctx)?;
        self.mask.apply(&mut ctx)?;
        Ok(ctx)
    }

    /// Renders `base` through the pipeline.
    pub fn render(&self, base: Canvas) -> Result<Canvas> {
        Ok(self.render_context(base)?.canvas)
    }
}
