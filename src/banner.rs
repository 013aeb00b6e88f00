// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
                 _  __
  _____   ____ _| |/ _| ___  _ __ _ __ ___
 / _ \ \ / / _` | | |_ / _ \| '__| '_ ` _ \
|  __/\ V / (_| | |  _| (_) | |  | | | | | |
 \___| \_/ \__,_|_|_|  \___/|_|  |_| |_| |_|

    Model Evaluation Form
"#;
    println!("{}", banner);
}
