//! TypeScript declarations for component token paths.

use crate::tokens::TokenTree;

const TOKEN_VALUE_INTERFACE: &str = "export interface TokenValue {
  $value: string;
  $type: 'color' | 'number' | 'text';
  $description?: string;
  $extensions?: {
    accessibility?: {
      contrastRatio?: number;
      wcagLevel?: 'AA' | 'AAA';
    };
    usage?: {
      components?: string[];
      deprecated?: boolean;
    };
  };
}
";

/// Dotted path of every token in `tree`, depth-first in file order.
pub fn token_paths(tree: &TokenTree) -> Vec<String> {
    tree.leaves()
        .into_iter()
        .map(|(path, _)| path.dotted())
        .collect()
}

pub fn render_type_declarations(paths: &[String]) -> String {
    let union = if paths.is_empty() {
        "never".to_string()
    } else {
        paths
            .iter()
            .map(|path| format!("'{}'", path.replace('\\', "\\\\").replace('\'', "\\'")))
            .collect::<Vec<_>>()
            .join(" |\n  ")
    };
    format!(
        "// Auto-generated token types - DO NOT EDIT\nexport type ComponentTokenPaths =\n  {union};\n\n{TOKEN_VALUE_INTERFACE}"
    )
}
