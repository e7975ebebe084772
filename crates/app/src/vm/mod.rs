mod attempt_vm;
mod catalog_vm;
mod result_vm;
mod time_fmt;

pub use attempt_vm::{
    INPUT_HELP, Input, Redraw, notice_line, parse_input, redraw, render, timer_line,
};
pub use catalog_vm::map_catalog;
pub use result_vm::{map_history, map_result};
