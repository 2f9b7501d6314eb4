//! Camera payload for scene nodes
//!
//! A camera describes the projection only. Its placement is the node
//! transform; the view matrix is the inverse of the camera's world transform
//! (see [`super::SceneGraph::view_matrix`]).

use crate::foundation::math::{Mat4, Mat4Ext, utils};

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection with a vertical field of view
    Perspective {
        /// Vertical field of view in degrees
        fov_degrees: f32,
    },
    /// Pixel-space orthographic projection (origin bottom-left)
    Orthographic,
}

/// Camera parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    width: u32,
    height: u32,
    near: f32,
    far: f32,
    projection: Projection,
}

impl Camera {
    /// Perspective camera for a viewport of `width` x `height`
    pub fn perspective(width: u32, height: u32, near: f32, far: f32, fov_degrees: f32) -> Self {
        Self {
            width,
            height,
            near,
            far,
            projection: Projection::Perspective { fov_degrees },
        }
    }

    /// Orthographic camera mapping one unit to one pixel
    pub fn orthographic(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            near: -1.0,
            far: 1.0,
            projection: Projection::Orthographic,
        }
    }

    /// Viewport width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Near clip distance
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clip distance
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the clip distances
    pub fn set_clip(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    /// Projection model
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Vertical field of view in degrees, `None` for orthographic cameras
    pub fn fov(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov_degrees } => Some(fov_degrees),
            Projection::Orthographic => None,
        }
    }

    /// Change the field of view; ignored by orthographic cameras
    pub fn set_fov(&mut self, fov: f32) {
        if let Projection::Perspective { fov_degrees } = &mut self.projection {
            *fov_degrees = fov;
        }
    }

    /// Resize the viewport
    pub fn update_window_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Width over height; a zero height is treated as one pixel
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Projection matrix for the current viewport
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_degrees } => {
                Mat4::perspective(utils::deg_to_rad(fov_degrees), self.aspect(), self.near, self.far)
            }
            Projection::Orthographic => {
                Mat4::orthographic(0.0, self.width as f32, 0.0, self.height as f32, self.near, self.far)
            }
        }
    }
}
