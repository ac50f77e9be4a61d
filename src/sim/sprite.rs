//! Visual representation of an entity: frames, directional rows and
//! animation counters.
//!
//! A sprite is a flat list of frames laid out as `rows × columns`.  With a
//! facing map each row holds the animation for one viewing direction; the
//! row is chosen from the angle between the entity's heading and the line
//! to the viewer.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use thiserror::Error;

use crate::world::{NO_TEXTURE, TextureId};

/// Two key distances closer than this count as a tie.
const TIE_EPSILON: f32 = 1e-5;

/// The six pre-rendered viewing directions of a sentry.
///
/// `FrontLeft` means the viewer stands to the sentry's left-front, i.e. the
/// relative angle is positive (counter-clockwise from its heading).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Front,
    FrontLeft,
    BackLeft,
    Back,
    BackRight,
    FrontRight,
}

impl Facing {
    /// Sheet row order.
    pub const ALL: [Facing; 6] = [
        Facing::Front,
        Facing::FrontLeft,
        Facing::BackLeft,
        Facing::Back,
        Facing::BackRight,
        Facing::FrontRight,
    ];

    /// Asset stem, e.g. `enemy-front-left.png`.
    pub fn asset_name(self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::FrontLeft => "front-left",
            Facing::BackLeft => "back-left",
            Facing::Back => "back",
            Facing::BackRight => "back-right",
            Facing::FrontRight => "front-right",
        }
    }

    /// Centre of the 60° band this image covers, in `[0, 2π)`.
    pub fn key_angle(self) -> f32 {
        match self {
            Facing::Front => 0.0,
            Facing::FrontLeft => PI / 3.0,
            Facing::BackLeft => 2.0 * PI / 3.0,
            Facing::Back => PI,
            Facing::BackRight => 4.0 * PI / 3.0,
            Facing::FrontRight => 5.0 * PI / 3.0,
        }
    }

    /// Facing map giving every direction its row in [`Facing::ALL`] order.
    pub fn facing_map() -> FacingMap {
        FacingMap::new(Self::ALL.iter().enumerate().map(|(row, f)| (f.key_angle(), row)))
    }
}

/// Angle of the line `pos → viewer` relative to `heading`, in `[0, 2π)`.
pub fn relative_angle(pos: Vec2, heading: f32, viewer: Vec2) -> f32 {
    let to_viewer = viewer - pos;
    let a = (to_viewer.y.atan2(to_viewer.x) - heading).rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if a >= TAU { 0.0 } else { a }
}

/// Sorted `(key angle, sheet row)` pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacingMap {
    keys: Vec<(f32, usize)>,
}

impl FacingMap {
    pub fn new(entries: impl IntoIterator<Item = (f32, usize)>) -> Self {
        let mut keys: Vec<_> = entries.into_iter().collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key closest to `angle` on the circle; ties go to the smaller key.
    pub fn closest_key(&self, angle: f32) -> Option<f32> {
        self.closest(angle).map(|(k, _)| k)
    }

    /// Sheet row of the closest key.
    pub fn row_for(&self, angle: f32) -> Option<usize> {
        self.closest(angle).map(|(_, r)| r)
    }

    fn closest(&self, angle: f32) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        let mut best_diff = f32::MAX;
        for &(key, row) in &self.keys {
            let d = (key - angle).abs();
            let diff = d.min(TAU - d);
            if diff < best_diff - TIE_EPSILON {
                best_diff = diff;
                best = Some((key, row));
            }
        }
        best
    }
}

/// Bad sheet geometry handed to a [`Sprite`] constructor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
    #[error("sprite sheet has no frames")]
    Empty,

    #[error("{frames} frames do not fill a {columns}×{rows} sheet")]
    SizeMismatch {
        frames: usize,
        columns: usize,
        rows: usize,
    },
}

/// Frames plus animation state of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    frames: Vec<TextureId>,
    columns: usize,
    rows: usize,
    facing: FacingMap,
    /// Tics per frame advance; `<= 0` keeps the frame fixed.
    anim_rate: i32,
    anim_counter: i32,
    loop_counter: u32,
    reversed: bool,
    tex_num: usize,
    row: usize,
}

impl Default for Sprite {
    fn default() -> Self {
        Self::still(NO_TEXTURE)
    }
}

impl Sprite {
    /// One static image.
    pub fn still(tex: TextureId) -> Self {
        Self::from_frames(vec![tex], 1, 1, 0)
    }

    /// A sheet of `columns × rows` frames (row-major) starting on `index`,
    /// which is clamped to the sheet.
    pub fn sheet(
        frames: Vec<TextureId>,
        columns: usize,
        rows: usize,
        index: usize,
    ) -> Result<Self, SpriteError> {
        if frames.is_empty() || columns == 0 || rows == 0 {
            return Err(SpriteError::Empty);
        }
        if frames.len() != columns * rows {
            return Err(SpriteError::SizeMismatch {
                frames: frames.len(),
                columns,
                rows,
            });
        }
        Ok(Self::from_frames(frames, columns, rows, index))
    }

    /// A sheet that advances one frame every `rate` tics.
    pub fn animated(
        frames: Vec<TextureId>,
        columns: usize,
        rows: usize,
        rate: i32,
    ) -> Result<Self, SpriteError> {
        Ok(Self {
            anim_rate: rate,
            ..Self::sheet(frames, columns, rows, 0)?
        })
    }

    /// `frames.len() == columns * rows > 0` is up to the caller.
    fn from_frames(frames: Vec<TextureId>, columns: usize, rows: usize, index: usize) -> Self {
        let tex_num = index.min(frames.len() - 1);
        Self {
            frames,
            columns,
            rows,
            facing: FacingMap::default(),
            anim_rate: 0,
            anim_counter: 0,
            loop_counter: 0,
            reversed: false,
            tex_num,
            row: tex_num / columns,
        }
    }

    pub fn with_facing(mut self, facing: FacingMap) -> Self {
        self.facing = facing;
        self
    }

    /// Current frame.
    #[inline]
    pub fn texture(&self) -> TextureId {
        self.frames[self.tex_num]
    }

    #[inline]
    pub fn frame_index(&self) -> usize {
        self.tex_num
    }

    #[inline]
    pub fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    /// Jump to `tex_num` (clamped to the sheet); the facing row follows.
    pub fn set_frame(&mut self, tex_num: usize) {
        self.tex_num = tex_num.min(self.frames.len() - 1);
        self.row = self.tex_num / self.columns;
    }

    /// Back to the first frame of the active row with fresh counters.
    pub fn reset_animation(&mut self) {
        self.anim_counter = 0;
        self.loop_counter = 0;
        self.set_frame(self.row * self.columns);
    }

    /// Inclusive frame bounds of the active row (the whole sheet without a
    /// facing map).
    pub fn frame_bounds(&self) -> (usize, usize) {
        if self.facing.len() > 1 {
            let min = self.row * self.columns;
            (min, min + self.columns - 1)
        } else {
            (0, self.frames.len() - 1)
        }
    }

    /// Pick the facing row for a viewer at `relative` radians from the
    /// entity's heading; keeps the column within the row.
    pub fn face(&mut self, relative: f32) {
        if self.facing.len() <= 1 {
            return;
        }
        if let Some(row) = self.facing.row_for(relative) {
            let row = row.min(self.rows - 1);
            if row != self.row {
                let col = self.tex_num % self.columns;
                self.row = row;
                self.tex_num = row * self.columns + col;
            }
        }
    }

    /// One tic: re-face toward the viewer, then advance the animation.
    pub fn update(&mut self, pos: Vec2, heading: f32, viewer: Option<Vec2>) {
        if let Some(cam) = viewer {
            self.face(relative_angle(pos, heading, cam));
        }
        self.tick();
    }

    /// Advance the frame counter by one tic.
    pub fn tick(&mut self) {
        if self.anim_rate <= 0 {
            return;
        }
        self.anim_counter += 1;
        if self.anim_counter < self.anim_rate {
            return;
        }
        self.anim_counter = 0;

        let (min, max) = self.frame_bounds();
        if self.reversed {
            if self.tex_num <= min || self.tex_num > max {
                self.tex_num = max;
                self.loop_counter += 1;
            } else {
                self.tex_num -= 1;
            }
        } else if self.tex_num >= max || self.tex_num < min {
            self.tex_num = min;
            self.loop_counter += 1;
        } else {
            self.tex_num += 1;
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn quarter_map() -> FacingMap {
        FacingMap::new([(0.0, 0), (FRAC_PI_2, 1), (PI, 2), (3.0 * FRAC_PI_2, 3)])
    }

    #[test]
    fn closest_key_on_circle() {
        let map = quarter_map();
        assert_eq!(map.closest_key(FRAC_PI_2 + 0.01), Some(FRAC_PI_2));
        // wraps across 2π
        assert_eq!(map.closest_key(TAU - 0.1), Some(0.0));
        assert_eq!(map.row_for(PI + 0.3), Some(2));
        assert_eq!(FacingMap::default().closest_key(1.0), None);
    }

    #[test]
    fn equidistant_angle_picks_first_key() {
        let map = quarter_map();
        assert_eq!(map.closest_key(3.0 * PI / 4.0), Some(FRAC_PI_2));
        assert_eq!(map.closest_key(PI / 4.0), Some(0.0));
        // unsorted input is sorted first
        let shuffled = FacingMap::new([(PI, 2), (FRAC_PI_2, 1), (0.0, 0)]);
        assert_eq!(shuffled.closest_key(3.0 * PI / 4.0), Some(FRAC_PI_2));
    }

    #[test]
    fn forward_animation_wraps_and_counts() {
        let rate = 3;
        let mut s = Sprite::animated(vec![10, 11, 12, 13], 4, 1, rate).unwrap();
        assert_eq!(s.frame_bounds(), (0, 3));
        for _ in 0..rate {
            s.tick();
        }
        assert_eq!(s.frame_index(), 1);
        for _ in 0..3 * rate {
            s.tick();
        }
        assert_eq!(s.frame_index(), 0);
        assert_eq!(s.loop_counter(), 1);
        assert_eq!(s.texture(), 10);
    }

    #[test]
    fn reversed_animation_wraps_to_top() {
        let mut s = Sprite::animated(vec![1, 2, 3, 4], 4, 1, 1).unwrap();
        s.set_reversed(true);
        s.tick();
        assert_eq!(s.frame_index(), 3);
        assert_eq!(s.loop_counter(), 1);
        s.tick();
        assert_eq!(s.frame_index(), 2);
    }

    #[test]
    fn static_sprite_never_advances() {
        let mut s = Sprite::sheet(vec![1, 2, 3], 3, 1, 1).unwrap();
        for _ in 0..100 {
            s.tick();
        }
        assert_eq!(s.frame_index(), 1);
        let mut neg = Sprite::animated(vec![1, 2], 2, 1, -4).unwrap();
        neg.tick();
        assert_eq!(neg.frame_index(), 0);
    }

    #[test]
    fn facing_keeps_frame_inside_row() {
        // 2 frames per direction, 4 directions
        let frames: Vec<TextureId> = (0..8).collect();
        let mut s = Sprite::animated(frames, 2, 4, 1)
            .unwrap()
            .with_facing(quarter_map());
        s.face(PI);
        assert_eq!(s.frame_bounds(), (4, 5));
        assert_eq!(s.frame_index(), 4);
        for _ in 0..5 {
            s.tick();
            let (lo, hi) = s.frame_bounds();
            assert!((lo..=hi).contains(&s.frame_index()));
        }
        // column survives a change of row
        let col = s.frame_index() % 2;
        s.face(FRAC_PI_2);
        assert_eq!(s.frame_index(), 2 + col);
    }

    #[test]
    fn update_faces_the_viewer() {
        let mut s = Sprite::sheet((0..6).collect(), 1, 6, 0)
            .unwrap()
            .with_facing(Facing::facing_map());
        let pos = Vec2::new(5.0, 5.0);
        // heading +x; viewer straight ahead → front
        s.update(pos, 0.0, Some(Vec2::new(9.0, 5.0)));
        assert_eq!(Facing::ALL[s.frame_index()], Facing::Front);
        // viewer directly behind → back
        s.update(pos, 0.0, Some(Vec2::new(1.0, 5.0)));
        assert_eq!(Facing::ALL[s.frame_index()], Facing::Back);
        // viewer ~76° counter-clockwise → left side, front band
        s.update(pos, 0.0, Some(Vec2::new(6.0, 9.0)));
        assert_eq!(Facing::ALL[s.frame_index()], Facing::FrontLeft);
    }

    #[test]
    fn facing_bands_are_sixty_degrees() {
        let map = Facing::facing_map();
        let pick = |deg: f32| Facing::ALL[map.row_for(deg.to_radians().rem_euclid(TAU)).unwrap()];
        assert_eq!(pick(0.0), Facing::Front);
        assert_eq!(pick(29.0), Facing::Front);
        assert_eq!(pick(-29.0), Facing::Front);
        assert_eq!(pick(31.0), Facing::FrontLeft);
        assert_eq!(pick(89.0), Facing::FrontLeft);
        assert_eq!(pick(91.0), Facing::BackLeft);
        assert_eq!(pick(149.0), Facing::BackLeft);
        assert_eq!(pick(151.0), Facing::Back);
        assert_eq!(pick(-151.0), Facing::Back);
        assert_eq!(pick(-149.0), Facing::BackRight);
        assert_eq!(pick(-91.0), Facing::BackRight);
        assert_eq!(pick(-89.0), Facing::FrontRight);
        assert_eq!(pick(-31.0), Facing::FrontRight);
    }

    #[test]
    fn relative_angle_is_normalised() {
        let a = relative_angle(Vec2::ZERO, PI, Vec2::new(1.0, 0.0));
        assert!((a - PI).abs() < 1e-6);
        let b = relative_angle(Vec2::ZERO, 0.5, Vec2::new(1.0, 0.0));
        assert!((0.0..TAU).contains(&b));
        assert!((b - (TAU - 0.5)).abs() < 1e-5);
        // a hair below zero must not come back as 2π
        let c = relative_angle(Vec2::ZERO, 1e-9, Vec2::new(1.0, 0.0));
        assert!((0.0..TAU).contains(&c), "{c}");
    }

    #[test]
    fn bad_sheets_are_rejected() {
        assert_eq!(Sprite::sheet(vec![], 1, 1, 0), Err(SpriteError::Empty));
        assert_eq!(Sprite::sheet(vec![1], 0, 1, 0), Err(SpriteError::Empty));
        assert_eq!(
            Sprite::animated(vec![1, 2, 3], 2, 2, 1),
            Err(SpriteError::SizeMismatch {
                frames: 3,
                columns: 2,
                rows: 2
            })
        );
        // start index is clamped onto the last frame
        assert_eq!(Sprite::sheet(vec![7, 8], 2, 1, 9).unwrap().texture(), 8);
    }

    #[test]
    fn set_frame_clamps_and_moves_row() {
        let frames: Vec<TextureId> = (0..8).collect();
        let mut s = Sprite::animated(frames, 2, 4, 1)
            .unwrap()
            .with_facing(quarter_map());
        s.set_frame(5);
        assert_eq!(s.frame_index(), 5);
        assert_eq!(s.frame_bounds(), (4, 5));
        s.set_frame(100);
        assert_eq!(s.frame_index(), 7);
        assert_eq!(s.frame_bounds(), (6, 7));
        s.set_frame(0);
        assert_eq!(s.frame_bounds(), (0, 1));
    }

    #[test]
    fn reset_returns_to_row_start() {
        let frames: Vec<TextureId> = (0..8).collect();
        let mut s = Sprite::animated(frames, 2, 4, 1)
            .unwrap()
            .with_facing(quarter_map());
        s.face(PI);
        for _ in 0..3 {
            s.tick();
        }
        assert_eq!(s.loop_counter(), 1);
        assert_eq!(s.frame_index(), 5);

        s.reset_animation();
        assert_eq!(s.frame_index(), 4);
        assert_eq!(s.loop_counter(), 0);
        // animation resumes from the row start
        s.tick();
        assert_eq!(s.frame_index(), 5);
    }
}
