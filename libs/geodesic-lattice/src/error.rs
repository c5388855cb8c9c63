//! # Lattice Errors
//!
//! Error types for lattice generation.

use std::fmt;

use lattice_mesh::MeshError;
use thiserror::Error;

use crate::graph::FaceError;

/// Result type for lattice operations.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Pipeline step in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Base icosphere creation.
    BaseSphere,
    /// Outer sphere volume from the base sphere.
    OuterVolume,
    /// Wireframe solidify of the jittered dual.
    Struts,
    /// Optional voxel remesh of the struts.
    Remesh,
    /// Intersection with the outer sphere volume.
    IntersectOuter,
    /// Inner sphere volume creation.
    InnerVolume,
    /// Difference with the inner sphere volume.
    Hollow,
    /// Dome cutter creation.
    DomeCutter,
    /// Intersection with the dome cutter.
    Dome,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BaseSphere => "base sphere",
            Self::OuterVolume => "outer volume",
            Self::Struts => "strut network",
            Self::Remesh => "voxel remesh",
            Self::IntersectOuter => "intersect outer",
            Self::InnerVolume => "inner volume",
            Self::Hollow => "hollow",
            Self::DomeCutter => "dome cutter",
            Self::Dome => "make dome",
        };
        write!(f, "{}", name)
    }
}

/// Errors that can occur while generating a lattice.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// Error from the `lattice-mesh` kernel.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Polygon face could not be created.
    #[error("Invalid face: {0}")]
    Topology(#[from] FaceError),

    /// Error reported by another geometry kernel.
    #[error("Kernel error: {0}")]
    Kernel(String),

    /// Error tagged with the pipeline step that produced it.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<LatticeError>,
    },
}

impl LatticeError {
    /// Creates a kernel error.
    pub fn kernel(message: impl Into<String>) -> Self {
        Self::Kernel(message.into())
    }

    /// Tags the error with the pipeline step it occurred in.
    pub fn in_stage(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Pipeline step of a stage-tagged error.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
