pub fn init_env() {
    // Missing `.env` is fine, the process environment is used as-is.
    let _ = dotenvy::dotenv();
}
