pub mod output;

pub use output::{
    create_writer, JsonWriter, MarkdownWriter, OutputFormat, OutputWriter, TerminalWriter,
};
