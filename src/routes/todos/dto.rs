use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddTodo {
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}
