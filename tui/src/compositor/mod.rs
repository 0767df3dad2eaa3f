//! Layered Compositor
//!
//! Manages z-ordered layers for rendering. Each layer owns a buffer in its
//! own origin coordinates and can be repositioned on resize.
//!
//! The compositor blits all layers, back to front, into one output
//! buffer that the app copies into the terminal frame.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(usize);

/// A single drawable region
struct Layer {
    /// Position and size on screen
    bounds: Rect,
    /// Layer-local buffer (origin at 0,0)
    buffer: Buffer,
    /// Higher draws later
    z_index: i32,
}

impl Layer {
    fn new(bounds: Rect, z_index: i32) -> Self {
        Self {
            bounds,
            buffer: Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height)),
            z_index,
        }
    }
}

/// The compositor manages all layers and composites them together
pub struct Compositor {
    /// Layers indexed by `LayerId`
    layers: Vec<Layer>,
    /// Layer ids sorted by z-index
    render_order: Vec<LayerId>,
    /// Composited result
    output: Buffer,
    /// Total area
    area: Rect,
}

impl Compositor {
    /// Create a new compositor for the given area
    pub fn new(area: Rect) -> Self {
        Self {
            layers: Vec::new(),
            render_order: Vec::new(),
            output: Buffer::empty(area),
            area,
        }
    }

    /// Create a new layer and return its ID
    pub fn create_layer(&mut self, bounds: Rect, z_index: i32) -> LayerId {
        let id = LayerId(self.layers.len());
        self.layers.push(Layer::new(bounds, z_index));
        self.update_render_order();
        id
    }

    /// Get mutable access to a layer's buffer for rendering
    pub fn layer_buffer_mut(&mut self, id: LayerId) -> Option<&mut Buffer> {
        self.layers.get_mut(id.0).map(|l| &mut l.buffer)
    }

    /// Move and resize a layer, discarding its contents if the size changed
    pub fn set_bounds(&mut self, id: LayerId, bounds: Rect) {
        if let Some(layer) = self.layers.get_mut(id.0) {
            if (layer.bounds.width, layer.bounds.height) != (bounds.width, bounds.height) {
                layer.buffer = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
            }
            layer.bounds = bounds;
        }
    }

    /// Resize the entire compositor
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Composite all layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        self.output.reset();

        for id in &self.render_order {
            Self::blit_layer(&mut self.output, self.area, &self.layers[id.0]);
        }

        &self.output
    }

    /// Blit a layer onto the output buffer
    ///
    /// Blank cells are transparent so lower layers show through.
    fn blit_layer(output: &mut Buffer, area: Rect, layer: &Layer) {
        let lb = layer.bounds;

        for ly in 0..lb.height {
            for lx in 0..lb.width {
                let (dst_x, dst_y) = (lb.x + lx, lb.y + ly);
                if dst_x >= area.width || dst_y >= area.height {
                    continue;
                }

                let Some(src) = layer.buffer.cell((lx, ly)) else {
                    continue;
                };
                if src.symbol() == " " {
                    continue;
                }
                if let Some(dst) = output.cell_mut((dst_x, dst_y)) {
                    *dst = src.clone();
                }
            }
        }
    }

    /// Update render order based on z-indices
    fn update_render_order(&mut self) {
        self.render_order = (0..self.layers.len()).map(LayerId).collect();
        self.render_order
            .sort_by_key(|id| self.layers[id.0].z_index);
    }
}
