use std::path::Path;

fn main() {
    let alias_path = Path::new("config/player_aliases.json");
    validate_alias_file(alias_path);
    set_build_dependencies();
}

fn validate_alias_file(alias_path: &Path) {
    // The alias table is optional at runtime, but a shipped one must be valid
    if !alias_path.exists() {
        println!(
            "cargo:warning=No alias table at {}, player aliases disabled",
            alias_path.display()
        );
        return;
    }

    let alias_contents = std::fs::read_to_string(alias_path).unwrap_or_else(|e| {
        panic!(
            "\n\nALIAS BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            alias_path.display()
        );
    });

    let aliases: serde_json::Value = serde_json::from_str(&alias_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nALIAS BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            alias_path.display()
        );
    });

    validate_alias_structure(&aliases);
}

fn validate_alias_structure(aliases: &serde_json::Value) {
    let players = aliases.as_object().unwrap_or_else(|| {
        panic!(
            "\n\nALIAS BUILD ERROR: Root must be a JSON object\n\
             Got: {aliases}\n"
        );
    });

    let mut total_aliases = 0;
    for (player, player_aliases) in players {
        total_aliases += validate_player_aliases(player, player_aliases);
    }

    println!(
        "cargo:warning=Validated alias table: {} players, {total_aliases} aliases",
        players.len()
    );
}

fn validate_player_aliases(player: &str, player_aliases: &serde_json::Value) -> usize {
    let list = player_aliases.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nALIAS BUILD ERROR: Aliases of '{player}' must be an array\n\
             Got: {player_aliases}\n"
        );
    });

    for (i, alias) in list.iter().enumerate() {
        let text = alias.as_str().unwrap_or_else(|| {
            panic!("\n\nALIAS BUILD ERROR: Alias {i} of '{player}' must be a string\nGot: {alias}\n");
        });
        assert!(
            !text.trim().is_empty(),
            "\n\nALIAS BUILD ERROR: Alias {i} of '{player}' is empty\n"
        );
    }

    list.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the alias table changes
    println!("cargo:rerun-if-changed=config/player_aliases.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
