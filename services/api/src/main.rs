use scheme_finder_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("scheme finder error: {err}");
        std::process::exit(1);
    }
}
