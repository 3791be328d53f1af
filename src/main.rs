fn main() -> anyhow::Result<()> {
    wttr_desk::run()
}
