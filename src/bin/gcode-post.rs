use anyhow::Result;

fn main() -> Result<()> {
    gcode_post::cli::run()
}
