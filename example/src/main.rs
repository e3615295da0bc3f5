fn main() -> anyhow::Result<()> {
    example::run()
}
