//! The board facade: the single entry point for move application, eye and
//! liberty queries, random move generation, and scoring.
//!
//! Layout is a 1-D array of side `size + 2`, with a one-cell off-board
//! sentinel frame so neighbor enumeration never needs a bounds check. The
//! frame is a full rectangular border (rather than a compact
//! skip-bottom-padding layout), since board side length is a runtime value.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use crate::census::Census;
use crate::constants::{deltas, COL_LABELS, PASS_MOVE};
use crate::error::PlayError;
use crate::group::{GroupId, GroupSlab};
use crate::stone::{Color, Stone};

pub type Point = usize;

/// Outcome of a successful (non-erroring) call to [`Board::play`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The stone was placed and belongs to the returned group.
    Placed(GroupId),
    /// The move was a legal suicide: the player's own group was removed
    /// and no stone remains at the played point.
    Suicide,
    Pass,
}

#[derive(Copy, Clone, Debug, Default)]
struct Captures {
    black: u32,
    white: u32,
}

impl Captures {
    fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn add(&mut self, color: Color, n: u32) {
        match color {
            Color::Black => self.black += n,
            Color::White => self.white += n,
        }
    }
}

/// A recorded ko restriction: `point` may not be replayed by `forbidden`
/// until another move intervenes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Ko {
    point: Point,
    forbidden: Color,
}

/// A Go board: absolute-color state, group registry, and pseudo-liberty
/// bookkeeping. Every successful operation must preserve stone/group
/// consistency, live chain membership, pseudo-liberty counts matching
/// stone-to-empty edges, capture-eagerness, free-queue membership, and
/// neighbor census accuracy.
#[derive(Clone)]
pub struct Board {
    size: usize,
    stride: usize,
    pub komi: f32,
    pub prohibit_suicide: bool,
    stones: Vec<Stone>,
    groups: Vec<Option<GroupId>>,
    next: Vec<Point>,
    census: Vec<Census>,
    group_slab: GroupSlab,
    free: Vec<Point>,
    free_index: Vec<Option<usize>>,
    ko: Option<Ko>,
    move_count: usize,
    last_move: Option<Point>,
    captures: Captures,
    to_play: Color,
}

impl Board {
    pub fn new(size: usize, komi: f32) -> Self {
        let mut b = Board {
            size: 0,
            stride: 0,
            komi,
            prohibit_suicide: true,
            stones: Vec::new(),
            groups: Vec::new(),
            next: Vec::new(),
            census: Vec::new(),
            group_slab: GroupSlab::new(),
            free: Vec::new(),
            free_index: Vec::new(),
            ko: None,
            move_count: 0,
            last_move: None,
            captures: Captures::default(),
            to_play: Color::Black,
        };
        b.resize(size);
        b
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn to_play(&self) -> Color {
        self.to_play
    }

    #[inline]
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    #[inline]
    pub fn captures(&self, color: Color) -> u32 {
        self.captures.get(color)
    }

    #[inline]
    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    /// Reallocate the board for a new side length, discarding all state.
    /// Board side length is a runtime parameter rather than a compile-time
    /// Cargo feature.
    pub fn resize(&mut self, size: usize) {
        self.size = size;
        self.stride = size + 2;
        let total = self.stride * self.stride;
        self.stones = vec![Stone::OffBoard; total];
        self.groups = vec![None; total];
        self.next = vec![0; total];
        self.census = vec![Census::new(); total];
        self.group_slab.clear();
        self.free = Vec::with_capacity(size * size);
        self.free_index = vec![None; total];
        self.ko = None;
        self.move_count = 0;
        self.last_move = None;
        self.captures = Captures::default();
        self.to_play = Color::Black;
        self.init_interior();
    }

    /// Reset to the empty position, keeping size, komi, and suicide policy.
    pub fn clear(&mut self) {
        let size = self.size;
        let komi = self.komi;
        let prohibit_suicide = self.prohibit_suicide;
        self.resize(size);
        self.komi = komi;
        self.prohibit_suicide = prohibit_suicide;
    }

    fn init_interior(&mut self) {
        for y in 1..=self.size {
            for x in 1..=self.size {
                let p = self.xy_to_point(x, y);
                self.stones[p] = Stone::Empty;
                self.push_free(p);
            }
        }
        for y in 1..=self.size {
            for x in 1..=self.size {
                let p = self.xy_to_point(x, y);
                for nb in self.orthogonal_neighbors(p) {
                    let nb_stone = self.stones[nb];
                    self.census[p].inc(nb_stone);
                }
            }
        }
    }

    #[inline]
    fn xy_to_point(&self, x: usize, y: usize) -> Point {
        y * self.stride + x
    }

    /// The 4 orthogonal neighbors of `p` (N, E, S, W), relying on the
    /// sentinel frame so no bounds check is needed.
    #[inline]
    pub fn orthogonal_neighbors(&self, p: Point) -> [Point; 4] {
        let d = deltas(self.stride);
        [
            (p as isize + d[0]) as Point,
            (p as isize + d[1]) as Point,
            (p as isize + d[2]) as Point,
            (p as isize + d[3]) as Point,
        ]
    }

    /// The 4 diagonal neighbors of `p` (NE, SE, SW, NW).
    #[inline]
    pub fn diagonal_neighbors(&self, p: Point) -> [Point; 4] {
        let d = deltas(self.stride);
        [
            (p as isize + d[4]) as Point,
            (p as isize + d[5]) as Point,
            (p as isize + d[6]) as Point,
            (p as isize + d[7]) as Point,
        ]
    }

    #[inline]
    pub fn stone_at(&self, p: Point) -> Stone {
        self.stones[p]
    }

    /// Iterate every playable point on the board.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let stride = self.stride;
        let size = self.size;
        (1..=size).flat_map(move |y| (1..=size).map(move |x| y * stride + x))
    }

    // -- free queue -------------------------------------------------------

    fn push_free(&mut self, p: Point) {
        self.free_index[p] = Some(self.free.len());
        self.free.push(p);
    }

    fn remove_free(&mut self, p: Point) {
        let idx = self.free_index[p].expect("point not in free queue");
        let last = self.free.len() - 1;
        self.free.swap(idx, last);
        let moved = self.free[idx];
        self.free_index[moved] = Some(idx);
        self.free.pop();
        self.free_index[p] = None;
    }

    // -- group helpers ------------------------------------------------------

    #[inline]
    pub fn group_at(&self, p: Point) -> Option<GroupId> {
        self.groups[p]
    }

    #[inline]
    pub fn group_libs(&self, g: GroupId) -> u32 {
        self.group_slab.libs(g)
    }

    #[inline]
    pub fn group_captured(&self, g: GroupId) -> bool {
        self.group_slab.is_captured(g)
    }

    /// All stones belonging to group `g`, in chain order.
    pub fn group_stones(&self, g: GroupId) -> Vec<Point> {
        self.chain_of(self.group_slab.get(g).base_stone)
    }

    /// All stones of the group whose chain contains `start`, in chain
    /// order. Works from any member, not just the group's `base_stone`.
    fn chain_of(&self, start: Point) -> Vec<Point> {
        let mut out = vec![start];
        let mut cur = self.next[start];
        while cur != start {
            out.push(cur);
            cur = self.next[cur];
        }
        out
    }

    /// True liberty set of a group, computed by walking its chain. Used by
    /// `group_in_atari` and scoring; the incrementally maintained `libs` on
    /// the group record is a pseudo-count and must not be used where the
    /// exact liberty set is required.
    fn group_true_liberties(&self, g: GroupId) -> Vec<Point> {
        let base = self.group_slab.get(g).base_stone;
        let mut libs = Vec::new();
        for s in self.chain_of(base) {
            for nb in self.orthogonal_neighbors(s) {
                if self.stones[nb] == Stone::Empty && !libs.contains(&nb) {
                    libs.push(nb);
                }
            }
        }
        libs
    }

    /// If the group is in atari, the single point that would capture it.
    pub fn group_in_atari(&self, g: GroupId) -> Option<Point> {
        let libs = self.group_true_liberties(g);
        if libs.len() == 1 {
            Some(libs[0])
        } else {
            None
        }
    }

    /// Remove every stone of group `g`, crediting the capture to the
    /// opposing color and restoring liberties to neighboring live groups.
    /// Returns the removed points.
    fn capture_group(&mut self, g: GroupId) -> Vec<Point> {
        let base = self.group_slab.get(g).base_stone;
        let stones = self.chain_of(base);
        let removed_color = self.stones[base].color().expect("captured group has a color");

        for &s in &stones {
            self.groups[s] = None;
            let old = self.stones[s];
            self.stones[s] = Stone::Empty;
            for nb in self.orthogonal_neighbors(s) {
                self.census[nb].replace(old, Stone::Empty);
                if let Some(ng) = self.groups[nb] {
                    if ng != g {
                        self.group_slab.add_libs(ng, 1);
                    }
                }
            }
            self.push_free(s);
        }
        self.group_slab.free(g);
        self.captures
            .add(removed_color.opponent(), stones.len() as u32);
        stones
    }

    /// Public capture entry point for callers that already hold a group id
    /// (e.g. after `group_in_atari`). Returns stones removed.
    pub fn capture(&mut self, g: GroupId) -> usize {
        self.capture_group(g).len()
    }

    // -- eyes -----------------------------------------------------------

    /// True iff every orthogonal neighbor of `p` is `color` or off-board.
    pub fn is_eyelike(&self, p: Point, color: Color) -> bool {
        self.census[p].is_eyelike_for(color.stone())
    }

    /// Refines `is_eyelike` with the false-eye diagonal filter: an interior
    /// point tolerates at most one opposing diagonal, while an edge or
    /// corner point (where some diagonals fall off the board) tolerates
    /// none.
    pub fn is_one_point_eye(&self, p: Point, color: Color) -> bool {
        if !self.is_eyelike(p, color) {
            return false;
        }
        let opp = color.opponent().stone();
        let mut opp_diag = 0u32;
        let mut edge_diag = 0u32;
        for d in self.diagonal_neighbors(p) {
            match self.stones[d] {
                Stone::OffBoard => edge_diag += 1,
                s if s == opp => opp_diag += 1,
                _ => {}
            }
        }
        if edge_diag > 0 {
            opp_diag == 0
        } else {
            opp_diag <= 1
        }
    }

    pub fn get_one_point_eye(&self, p: Point) -> Option<Color> {
        if self.is_one_point_eye(p, Color::Black) {
            Some(Color::Black)
        } else if self.is_one_point_eye(p, Color::White) {
            Some(Color::White)
        } else {
            None
        }
    }

    // -- coordinates ------------------------------------------------------

    /// Parse a GTP-style coordinate (`"D4"`, case-insensitive, `"pass"`)
    /// into a point. Column letters skip `'I'`, matching Go convention.
    pub fn parse_coord(&self, s: &str) -> Point {
        if s.eq_ignore_ascii_case("pass") {
            return PASS_MOVE;
        }
        let bytes = s.as_bytes();
        if bytes.len() < 2 {
            return PASS_MOVE;
        }
        let col_char = bytes[0].to_ascii_uppercase();
        let mut col = (col_char - b'A' + 1) as usize;
        if col_char > b'I' {
            col -= 1;
        }
        let row: usize = bytes[1..]
            .iter()
            .filter(|b| b.is_ascii_digit())
            .fold(0, |acc, &b| acc * 10 + (b - b'0') as usize);
        self.xy_to_point(col, self.size - row + 1)
    }

    /// Format a point as a GTP-style coordinate string.
    pub fn str_coord(&self, p: Point) -> String {
        if p == PASS_MOVE {
            return "pass".into();
        }
        let x = p % self.stride;
        let y = p / self.stride;
        let row = self.size - y + 1;
        let col_index = x - 1;
        let letter = COL_LABELS[col_index] as char;
        format!("{letter}{row}")
    }

    // -- move application -------------------------------------------------

    /// Apply a move by `color` at `p` (or `PASS_MOVE` to pass). Checks
    /// legality (occupied, off-board, ko, suicide) before committing any
    /// state, so a rejected move leaves the board unchanged.
    pub fn play(&mut self, color: Color, p: Point) -> Result<PlayOutcome, PlayError> {
        if p == PASS_MOVE {
            self.move_count += 1;
            self.last_move = None;
            self.ko = None;
            self.to_play = color.opponent();
            return Ok(PlayOutcome::Pass);
        }
        if self.stones[p] == Stone::OffBoard {
            return Err(PlayError::OffBoard);
        }
        if self.stones[p] != Stone::Empty {
            return Err(PlayError::Occupied);
        }
        if let Some(ko) = self.ko {
            if ko.point == p && ko.forbidden == color {
                return Err(PlayError::Ko);
            }
        }

        let stone = color.stone();
        let opp_stone = color.opponent().stone();
        let neighbors = self.orthogonal_neighbors(p);

        // Collect unique same-color and opposing-color neighbor groups,
        // each with how many of the 4 edges point to it (a group touched
        // along two edges loses/gains two pseudo-liberties, not one).
        let mut same_groups: Vec<(GroupId, u32)> = Vec::with_capacity(4);
        let mut opp_groups: Vec<(GroupId, u32)> = Vec::with_capacity(4);
        let mut empty_edges = 0u32;

        for &nb in &neighbors {
            let nb_stone = self.stones[nb];
            if nb_stone == Stone::Empty {
                empty_edges += 1;
            } else if nb_stone == stone {
                if let Some(g) = self.groups[nb] {
                    match same_groups.iter_mut().find(|(id, _)| *id == g) {
                        Some((_, n)) => *n += 1,
                        None => same_groups.push((g, 1)),
                    }
                }
            } else if nb_stone == opp_stone {
                if let Some(g) = self.groups[nb] {
                    match opp_groups.iter_mut().find(|(id, _)| *id == g) {
                        Some((_, n)) => *n += 1,
                        None => opp_groups.push((g, 1)),
                    }
                }
            }
        }

        // Legality: would this move be suicide? Decide using pre-capture
        // liberty counts, before mutating anything.
        let own_libs_pre: u32 = empty_edges
            + same_groups
                .iter()
                .map(|&(g, edges)| self.group_slab.libs(g) - edges)
                .sum::<u32>();
        let opp_would_be_captured = opp_groups
            .iter()
            .any(|&(g, edges)| self.group_slab.libs(g) <= edges);
        let is_suicide = !opp_would_be_captured && own_libs_pre == 0;
        if is_suicide && self.prohibit_suicide {
            return Err(PlayError::Suicide);
        }

        // Commit: place the stone and update census + free queue.
        self.stones[p] = stone;
        self.remove_free(p);
        for &nb in &neighbors {
            self.census[nb].replace(Stone::Empty, stone);
        }

        // Decrement opponent groups per edge and capture any that hit zero.
        for &(g, edges) in &opp_groups {
            self.group_slab.add_libs(g, -(edges as i32));
        }
        let mut removed_points: Vec<Point> = Vec::new();
        for &(g, _) in &opp_groups {
            if self.group_slab.is_captured(g) {
                removed_points.extend(self.capture_group(g));
            }
        }
        let total_captured = removed_points.len();
        let single_captured_point = if total_captured == 1 {
            Some(removed_points[0])
        } else {
            None
        };

        // Recompute own liberties from scratch now that captures (if any)
        // may have freed neighboring points and may have bumped the libs
        // of a same-color neighbor group that also bordered the capture.
        let own_empty_edges_final = neighbors
            .iter()
            .filter(|&&nb| self.stones[nb] == Stone::Empty)
            .count() as u32;
        let same_group_libs_post: Vec<u32> = same_groups
            .iter()
            .map(|&(g, _)| self.group_slab.libs(g))
            .collect();
        let new_libs = own_empty_edges_final
            + same_groups
                .iter()
                .zip(&same_group_libs_post)
                .map(|(&(_, edges), &libs)| libs - edges)
                .sum::<u32>();

        // Form or extend the placed stone's own group.
        let gid = if same_groups.is_empty() {
            let gid = self.group_slab.allocate(p, new_libs);
            self.groups[p] = Some(gid);
            self.next[p] = p;
            gid
        } else {
            let (survivor, _) = same_groups[0];
            let survivor_base = self.group_slab.get(survivor).base_stone;
            self.groups[p] = Some(survivor);
            self.next[p] = self.next[survivor_base];
            self.next[survivor_base] = p;
            for &(g, _) in &same_groups[1..] {
                self.absorb_chain(p, g, survivor);
            }
            self.group_slab.get_mut(survivor).libs = new_libs;
            survivor
        };

        if new_libs == 0 {
            // Legal suicide (prohibit_suicide is false here, or we would
            // have rejected the move already): the just-formed group has
            // no liberties and is removed immediately.
            self.capture_group(gid);
            self.move_count += 1;
            self.last_move = Some(p);
            self.ko = None;
            self.to_play = color.opponent();
            return Ok(PlayOutcome::Suicide);
        }

        // Classic single-stone ko: exactly one stone captured, and the
        // placed stone stands alone with exactly one liberty.
        self.ko = None;
        if let Some(captured_point) = single_captured_point {
            if same_groups.is_empty() && new_libs == 1 {
                self.ko = Some(Ko {
                    point: captured_point,
                    forbidden: color.opponent(),
                });
            }
        }

        self.move_count += 1;
        self.last_move = Some(p);
        self.to_play = color.opponent();
        Ok(PlayOutcome::Placed(gid))
    }

    /// Structurally merge `absorbed`'s chain into `survivor`'s (reassigning
    /// group ids and splicing the two circular `next` lists via a single
    /// pointer swap anchored at `survivor_anchor`, a point already known to
    /// be part of `survivor`'s list). Liberties are not touched here;
    /// callers compute the merged liberty count separately.
    fn absorb_chain(&mut self, survivor_anchor: Point, absorbed: GroupId, survivor: GroupId) {
        if absorbed == survivor {
            return;
        }
        let absorbed_base = self.group_slab.get(absorbed).base_stone;
        for s in self.chain_of(absorbed_base) {
            self.groups[s] = Some(survivor);
        }
        let tmp = self.next[survivor_anchor];
        self.next[survivor_anchor] = self.next[absorbed_base];
        self.next[absorbed_base] = tmp;
        self.group_slab.free(absorbed);
    }

    // -- scoring ----------------------------------------------------------

    /// Area score via flood-filled empty-region ownership. Positive =
    /// white ahead. Dame (regions touching both colors) score nothing.
    pub fn fast_score(&self) -> f32 {
        self.area_score(false)
    }

    /// Like `fast_score`, but first treats any group with no one-point eye
    /// of its own color as dead and folds it into the opponent's
    /// territory. Only meaningful on settled (both-passed) positions.
    pub fn official_score(&self) -> f32 {
        self.area_score(true)
    }

    fn area_score(&self, mark_dead: bool) -> f32 {
        let mut effective = self.stones.clone();
        if mark_dead {
            let mut seen_groups = HashSet::new();
            for p in self.points() {
                if let Some(g) = self.groups[p] {
                    if !seen_groups.insert(g) {
                        continue;
                    }
                    let base = self.group_slab.get(g).base_stone;
                    let chain = self.chain_of(base);
                    let color = self.stones[base].color().unwrap();
                    let alive = chain.iter().any(|&s| {
                        self.orthogonal_neighbors(s)
                            .into_iter()
                            .any(|nb| self.is_one_point_eye(nb, color))
                    });
                    if !alive {
                        for s in chain {
                            effective[s] = Stone::Empty;
                        }
                    }
                }
            }
        }

        let mut black = 0f32;
        let mut white = 0f32;
        let mut visited = vec![false; effective.len()];

        for p in self.points() {
            match effective[p] {
                Stone::Black => black += 1.0,
                Stone::White => white += 1.0,
                Stone::Empty => {
                    if visited[p] {
                        continue;
                    }
                    let (region, border_black, border_white) =
                        self.flood_empty_region(p, &effective, &mut visited);
                    if border_black && !border_white {
                        black += region.len() as f32;
                    } else if border_white && !border_black {
                        white += region.len() as f32;
                    }
                    // else dame: counts for neither.
                }
                Stone::OffBoard => {}
            }
        }
        white + self.komi - black
    }

    fn flood_empty_region(
        &self,
        start: Point,
        effective: &[Stone],
        visited: &mut [bool],
    ) -> (Vec<Point>, bool, bool) {
        let mut queue = VecDeque::new();
        let mut region = Vec::new();
        let mut border_black = false;
        let mut border_white = false;
        queue.push_back(start);
        visited[start] = true;
        while let Some(p) = queue.pop_front() {
            region.push(p);
            for nb in self.orthogonal_neighbors(p) {
                match effective[nb] {
                    Stone::Empty => {
                        if !visited[nb] {
                            visited[nb] = true;
                            queue.push_back(nb);
                        }
                    }
                    Stone::Black => border_black = true,
                    Stone::White => border_white = true,
                    Stone::OffBoard => {}
                }
            }
        }
        (region, border_black, border_white)
    }

    // -- random move generation -------------------------------------------

    /// Draw a uniformly random legal move for `color` that is not the
    /// player's own one-point eye. Never errors: falls back to a linear
    /// scan, then to pass.
    pub fn play_random(&mut self, color: Color, rng: &mut fastrand::Rng) -> Point {
        let attempts = self.free.len().max(1) * 2;
        for _ in 0..attempts {
            if self.free.is_empty() {
                break;
            }
            let idx = rng.usize(..self.free.len());
            let candidate = self.free[idx];
            if self.is_one_point_eye(candidate, color) {
                continue;
            }
            if self.play(color, candidate).is_ok() {
                return candidate;
            }
        }
        // Linear scan fallback: the rejection loop above can spin past its
        // budget when almost everything left is an own eye or illegal.
        for candidate in self.free.clone() {
            if self.is_one_point_eye(candidate, color) {
                continue;
            }
            if self.play(color, candidate).is_ok() {
                return candidate;
            }
        }
        self.play(color, PASS_MOVE).expect("pass is always legal");
        PASS_MOVE
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Move: {}   Black: {} caps   White: {} caps   Komi: {}",
            self.move_count,
            self.captures.get(Color::Black),
            self.captures.get(Color::White),
            self.komi
        )?;
        for y in 1..=self.size {
            write!(f, "{:>2} ", self.size - y + 1)?;
            for x in 1..=self.size {
                let p = self.xy_to_point(x, y);
                write!(f, " {}", self.stones[p])?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for x in 0..self.size {
            write!(f, " {}", COL_LABELS[x] as char)?;
        }
        writeln!(f)
    }
}
