use depot_core::catalog::Platform;

pub fn resolve(platform_id: &str) -> anyhow::Result<()> {
    let Some(platform) = Platform::resolve(platform_id) else {
        anyhow::bail!("unknown platform identifier `{platform_id}`");
    };

    let descriptor = platform.descriptor();
    println!(
        "{platform_id} -> {} ({:?})",
        descriptor.relative_path.display(),
        descriptor.kind
    );
    Ok(())
}
