fn main() -> anyhow::Result<()> {
    buildsmith_lib::main()
}
