//! Resource paths understood by the board service.
//!
//! Ids are percent-encoded as single path segments.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

const SEGMENT: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'#')
  .add(b'%')
  .add(b'/')
  .add(b'<')
  .add(b'>')
  .add(b'?')
  .add(b'\\')
  .add(b'`')
  .add(b'{')
  .add(b'}');

fn segment(id: &str) -> String {
  utf8_percent_encode(id, SEGMENT).to_string()
}

pub const PROFILE: &str = "/profile";
pub const BOARDS: &str = "/boards";
pub const LISTS: &str = "/lists";
pub const TASKS: &str = "/tasks";
pub const COMMENTS: &str = "/comments";

pub fn board(id: &str) -> String {
  format!("{}/{}", BOARDS, segment(id))
}

pub fn board_lists(board_id: &str) -> String {
  format!("{}/{}/lists", BOARDS, segment(board_id))
}

pub fn list(id: &str) -> String {
  format!("{}/{}", LISTS, segment(id))
}

pub fn list_tasks(list_id: &str) -> String {
  format!("{}/{}/tasks", LISTS, segment(list_id))
}

pub fn task(id: &str) -> String {
  format!("{}/{}", TASKS, segment(id))
}

pub fn task_comments(task_id: &str) -> String {
  format!("{}/{}/comments", TASKS, segment(task_id))
}

pub fn comment(id: &str) -> String {
  format!("{}/{}", COMMENTS, segment(id))
}
