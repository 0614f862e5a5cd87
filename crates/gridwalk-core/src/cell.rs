//! The [`Cell`] type and its [`CellKind`].

use crate::geom::Point;

/// What occupies a grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Empty,
    /// Never traversable.
    Obstacle,
    /// Traversable cell carrying an object for the classifier.
    TargetObject,
    Start,
    Goal,
}

impl CellKind {
    /// All kinds, in declaration order.
    pub const ALL: [CellKind; 5] = [
        CellKind::Empty,
        CellKind::Obstacle,
        CellKind::TargetObject,
        CellKind::Start,
        CellKind::Goal,
    ];

    /// Whether a search may step onto a cell of this kind.
    #[inline]
    pub const fn passable(self) -> bool {
        !matches!(self, CellKind::Obstacle)
    }

    /// Whether the selection operation may overwrite a cell of this kind.
    #[inline]
    pub const fn selectable(self) -> bool {
        !matches!(self, CellKind::Obstacle | CellKind::TargetObject)
    }

    /// ASCII glyph used by [`Grid::render`](crate::Grid::render).
    pub const fn glyph(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Obstacle => '#',
            CellKind::TargetObject => '*',
            CellKind::Start => 'S',
            CellKind::Goal => 'G',
        }
    }

    /// Lower-case name, as used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            CellKind::Empty => "empty",
            CellKind::Obstacle => "obstacle",
            CellKind::TargetObject => "target",
            CellKind::Start => "start",
            CellKind::Goal => "goal",
        }
    }
}

/// Opaque reference into an image catalog, attached to target cells.
///
/// The grid never interprets it; it is handed to the classifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageRef(pub u16);

/// A single grid cell. The position is fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pos: Point,
    pub kind: CellKind,
    pub image: Option<ImageRef>,
}

impl Cell {
    /// Create an empty cell at `pos`.
    #[inline]
    pub const fn new(pos: Point) -> Self {
        Self {
            pos,
            kind: CellKind::Empty,
            image: None,
        }
    }

    /// Set the kind (builder).
    #[inline]
    pub const fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the image reference (builder).
    #[inline]
    pub const fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    #[inline]
    pub(crate) const fn relocated(mut self, pos: Point) -> Self {
        self.pos = pos;
        self
    }

    /// The cell's position in its grid.
    #[inline]
    pub const fn pos(&self) -> Point {
        self.pos
    }
}
