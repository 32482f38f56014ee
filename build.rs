use std::fs;

// Every key `Config` needs. The library has no other source of defaults.
const KEYS: [(&str, &[&str]); 4] = [
    ("container", &["class"]),
    (
        "classes",
        &[
            "paragraph",
            "heading",
            "ordered_list",
            "unordered_list",
            "list_item",
            "unsupported",
        ],
    ),
    ("marks", &["style", "bold", "italic", "underline"]),
    ("links", &["class", "target", "rel", "allow_unsafe_schemes"]),
];

fn main() {
    // The default config is compiled into the library; reject it here
    // rather than at first use.
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for (section, keys) in KEYS {
        let Some(section_table) = table.get(section).and_then(|v| v.as_table()) else {
            panic!("default_config.toml is missing the [{}] table", section);
        };
        for key in keys {
            if !section_table.contains_key(*key) {
                panic!("default_config.toml is missing {}.{}", section, key);
            }
        }
    }
}
