use lattice_geom::Vec3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Top = 0,
    Bottom = 1,
    Right = 2,
    Left = 3,
    Front = 4,
    Back = 5,
}

/// Per-direction geometry of a unit cube face.
///
/// `corners` pair up with the UV corners `min`, `min+(0,h)`, `min+(w,0)`, `max`;
/// corners 1 and 2 form the diagonal shared by both triangles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceGeometry {
    pub corners: [Vec3; 4],
    pub normal: Vec3,
    pub tangent: Vec3,
    pub delta: (i32, i32, i32),
}

const fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

const FACE_TABLE: [FaceGeometry; 6] = [
    // Top (+Y)
    FaceGeometry {
        corners: [v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0)],
        normal: v(0.0, 1.0, 0.0),
        tangent: v(1.0, 0.0, 0.0),
        delta: (0, 1, 0),
    },
    // Bottom (-Y)
    FaceGeometry {
        corners: [v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0)],
        normal: v(0.0, -1.0, 0.0),
        tangent: v(-1.0, 0.0, 0.0),
        delta: (0, -1, 0),
    },
    // Right (+X)
    FaceGeometry {
        corners: [v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0)],
        normal: v(1.0, 0.0, 0.0),
        tangent: v(0.0, 0.0, -1.0),
        delta: (1, 0, 0),
    },
    // Left (-X)
    FaceGeometry {
        corners: [v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0)],
        normal: v(-1.0, 0.0, 0.0),
        tangent: v(0.0, 0.0, 1.0),
        delta: (-1, 0, 0),
    },
    // Front (+Z)
    FaceGeometry {
        corners: [v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0)],
        normal: v(0.0, 0.0, 1.0),
        tangent: v(1.0, 0.0, 0.0),
        delta: (0, 0, 1),
    },
    // Back (-Z)
    FaceGeometry {
        corners: [v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0)],
        normal: v(0.0, 0.0, -1.0),
        tangent: v(-1.0, 0.0, 0.0),
        delta: (0, 0, -1),
    },
];

impl Face {
    /// Emission order used by the mesher.
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Right,
        Face::Left,
        Face::Front,
        Face::Back,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face` value.
    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    #[inline]
    pub fn geometry(self) -> &'static FaceGeometry {
        &FACE_TABLE[self.index()]
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        self.geometry().normal
    }

    #[inline]
    pub fn tangent(self) -> Vec3 {
        self.geometry().tangent
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        self.geometry().delta
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Bottom => Face::Top,
            Face::Top => Face::Bottom,
            Face::Back => Face::Front,
            Face::Front => Face::Back,
        }
    }
}

/// Set of faces packed into the low six bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    pub const EMPTY: FaceMask = FaceMask(0);
    pub const ALL: FaceMask = FaceMask(0b11_1111);

    #[inline]
    pub fn insert(&mut self, face: Face) {
        self.0 |= 1 << face.index();
    }

    #[inline]
    pub fn contains(self, face: Face) -> bool {
        (self.0 >> face.index()) & 1 == 1
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Faces in emission order.
    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}
