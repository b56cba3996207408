fn main() {
    // `sqlx::migrate!` embeds the migration files at compile time, so a new
    // migration has to trigger a rebuild.
    println!("cargo:rerun-if-changed=migrations");
}
