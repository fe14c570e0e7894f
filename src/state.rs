use crate::data::Pos;
use crate::map::GoalMap;

/// The dynamic part of a level. Boxes are kept sorted so equal positions
/// always produce equal (and equally hashed) states.
#[derive(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct State {
    pub(crate) player_pos: Pos,
    pub(crate) boxes: Vec<Pos>,
}

impl State {
    pub(crate) fn new(player_pos: Pos, mut boxes: Vec<Pos>) -> State {
        boxes.sort(); // sort to detect equal states when we reorder boxes
        State { player_pos, boxes }
    }

    pub fn player(&self) -> Pos {
        self.player_pos
    }

    pub fn boxes(&self) -> &[Pos] {
        &self.boxes
    }

    pub fn has_box(&self, pos: Pos) -> bool {
        self.box_index(pos).is_some()
    }

    pub(crate) fn box_index(&self, pos: Pos) -> Option<usize> {
        self.boxes.binary_search(&pos).ok()
    }

    /// Player moved to `new_player_pos` without touching any box.
    pub(crate) fn with_step(&self, new_player_pos: Pos) -> State {
        State {
            player_pos: new_player_pos,
            boxes: self.boxes.clone(),
        }
    }

    /// Player moved onto the box at `box_index` and pushed it to `box_dest`.
    pub(crate) fn with_push(&self, box_index: usize, box_dest: Pos) -> State {
        let new_player_pos = self.boxes[box_index];
        let mut new_boxes = self.boxes.clone();
        new_boxes[box_index] = box_dest;
        State::new(new_player_pos, new_boxes)
    }

    /// Solved iff the box set equals the goal set.
    pub fn is_goal_state(&self, map: &GoalMap) -> bool {
        self.boxes == map.goals
    }
}
