use ad_catalog::server::AdServerApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    AdServerApp::run().await.inspect_err(|err| {
        eprintln!("adserver errored out: {err:#}");
    })
}
