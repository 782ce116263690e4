use anyhow::Context;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let app = sandglass::SandglassApp::new().context("failed to create application")?;
    app.run().context("application failed")?;

    Ok(())
}
