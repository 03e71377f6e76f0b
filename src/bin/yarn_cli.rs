#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("yarn_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    use yarn_engine::export::{ObjOptions, write_obj_file, write_polylines_obj};
    use yarn_engine::geom::{CurveDiagnostics, PolylineSet, fiber_curves, yarn_curves};
    use yarn_engine::parse::preset_xml;
    use yarn_engine::preset::{PARAMETER_NAMES, YarnPreset, suggest_parameter};

    const USAGE: &str = r#"yarn_cli (yarn-engine)

USAGE:
  yarn_cli list
  yarn_cli yarn [options]
  yarn_cli fiber [options]
  yarn_cli preset <name|file.xml> [options]
  yarn_cli dump <name|file.xml>

COMMANDS:
  list               Show built-in presets and parameter names
  yarn               Write yarn centerlines (one polyline per row)
  fiber              Write fibers around the yarn (one polyline per row and fiber)
  preset             Write a preset; fibers if the preset defines them
  dump               Print a preset as XML

OPTIONS:
  --out <path>       Write OBJ to this file (default: stdout)
  --name <name>      Object name written as `o <name>`
  --overwrite        Overwrite an existing output file
  --a <f64>          Loop roundness            (default 0.2)
  --h <f64>          Loop height               (default 1.0)
  --d <f64>          Loop depth                (default 0.3)
  --rows <n>         Rows in wale direction
  --loops <n>        Loops per row
  --samples <n>      Samples per loop
  --row-offset <f64> Row spacing
  --radius <f64>     Fiber radius
  --omega <f64>      Fiber twist
  --fibers <n>       Fibers around the yarn
  -h, --help         Show this help
"#;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Yarn,
        Fiber,
        FromPreset,
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_presets();
                Ok(())
            }
            "yarn" => cmd_generate(Mode::Yarn, YarnPreset::default(), &mut args),
            "fiber" => cmd_generate(Mode::Fiber, YarnPreset::default(), &mut args),
            "preset" => {
                let source = args.value("preset")?;
                let preset = load_preset(&source)?;
                cmd_generate(Mode::FromPreset, preset, &mut args)
            }
            "dump" => {
                let source = args.value("dump")?;
                let preset = load_preset(&source)?;
                let xml = preset_xml::to_xml(&preset).map_err(|e| e.to_string())?;
                println!("{xml}");
                Ok(())
            }
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_presets() {
        println!("presets:");
        for name in YarnPreset::builtin_names() {
            println!("  {name}");
        }
        println!("parameters:");
        for name in PARAMETER_NAMES {
            println!("  {name}");
        }
    }

    fn load_preset(source: &str) -> Result<YarnPreset, String> {
        if let Some(preset) = YarnPreset::builtin(source) {
            return Ok(preset);
        }

        let path = Path::new(source);
        if !path.exists() {
            return Err(format!(
                "`{source}` is neither a built-in preset nor a file (see `yarn_cli list`)"
            ));
        }
        let xml = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        preset_xml::parse_str(&xml).map_err(|e| format!("{}: {e}", path.display()))
    }

    fn cmd_generate(mode: Mode, mut preset: YarnPreset, args: &mut Args) -> Result<(), String> {
        let mut out: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut object_name = preset.name.clone();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => out = Some(PathBuf::from(args.value("--out")?)),
                "--name" => object_name = Some(args.value("--name")?),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                flag if flag.starts_with("--") => {
                    let name = parameter_for_flag(flag)?;
                    let raw = args.value(flag)?;
                    let value: f64 = raw
                        .parse()
                        .map_err(|_| format!("{flag} expects a number, got `{raw}`"))?;
                    preset.set_parameter(name, value).map_err(|e| e.to_string())?;
                }
                other => return Err(format!("unexpected argument `{other}`\n\n{USAGE}")),
            }
        }

        let (curves, diagnostics) = generate(mode, &preset)?;
        let options = ObjOptions {
            object_name,
            comment: Some("yarn-engine yarn_cli".to_owned()),
        };

        match out.as_deref() {
            Some(path) => {
                write_curves_file(path, &curves, &options, overwrite)?;
                eprintln!("wrote {}", path.display());
            }
            None => {
                write_polylines_obj(io::stdout().lock(), &curves, &options)
                    .map_err(|e| format!("write obj: {e}"))?;
            }
        }

        eprintln!(
            "{}: vertices={} polylines={} | {}",
            preset.name.as_deref().unwrap_or(mode_label(mode, &preset)),
            curves.vertex_count(),
            curves.polyline_count(),
            diagnostics.summary()
        );
        for warning in &diagnostics.warnings {
            eprintln!("warning: {warning}");
        }

        Ok(())
    }

    fn generate(mode: Mode, preset: &YarnPreset) -> Result<(PolylineSet, CurveDiagnostics), String> {
        let fibers = match mode {
            Mode::Yarn => None,
            Mode::Fiber => Some(preset.fibers.unwrap_or(yarn_engine::preset::DEFAULT_FIBERS)),
            Mode::FromPreset => preset.fibers,
        };

        let result = match fibers {
            Some(bundle) => fiber_curves(preset.grid, preset.shape, bundle),
            None => yarn_curves(preset.grid, preset.shape),
        };
        result.map_err(|e| e.to_string())
    }

    fn mode_label(mode: Mode, preset: &YarnPreset) -> &'static str {
        match mode {
            Mode::Yarn => "yarn",
            Mode::Fiber => "fiber",
            Mode::FromPreset if preset.fibers.is_some() => "fiber",
            Mode::FromPreset => "yarn",
        }
    }

    fn parameter_for_flag(flag: &str) -> Result<&'static str, String> {
        let name = flag.trim_start_matches("--");
        let canonical = match name {
            "samples" => "samples_per_loop",
            other => other,
        }
        .replace('-', "_");

        PARAMETER_NAMES
            .iter()
            .copied()
            .find(|candidate| *candidate == canonical)
            .ok_or_else(|| match suggest_parameter(&canonical) {
                Some(suggestion) => format!(
                    "unknown option `{flag}` (did you mean `--{}`?)",
                    suggestion.replace('_', "-")
                ),
                None => format!("unknown option `{flag}`\n\n{USAGE}"),
            })
    }

    fn write_curves_file(
        path: &Path,
        curves: &PolylineSet,
        options: &ObjOptions,
        overwrite: bool,
    ) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        write_obj_file(path, curves, options).map_err(|e| e.to_string())
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
