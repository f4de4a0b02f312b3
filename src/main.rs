fn main() -> Result<(), anyhow::Error> {
    ducttape::run()
}
