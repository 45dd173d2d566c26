use clap::{
    arg,
    builder::{styling::AnsiColor, Styles},
    crate_description, crate_name, crate_version, ColorChoice, Command,
};
use ytcard::constants::media::{DOWNLOADER, TRANSCODER};

fn env_no_color() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|x| !x.is_empty())
}

// Builds the application command line interface defining the arguments
pub fn build_app(interactive_output: bool) -> Command {
    let color_when = if interactive_output && !env_no_color() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Green.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default());

    Command::new(crate_name!())
    .styles(styles)
    .version(crate_version!())
    .about(crate_description!())
    .color(color_when)
    .arg(
        arg!(-r --root <DIR> "Project root the default paths are relative to")
        .long_help(
            "Directory holding the README, the themes directory and the dist folder. \
                    Environment variables and ~ are expanded.",
        )
        .default_value("."),
    )
    .arg(
        arg!(--readme <FILE> "Markdown file holding the YT_MUSIC_CONFIG block")
        .long_help("Markdown file holding the configuration comment block (defaults to <root>/README.md)."),
    )
    .arg(
        arg!(--"themes-dir" <DIR> "Directory holding the SVG themes")
        .long_help("Directory the configured theme is read from (defaults to <root>/themes)."),
    )
    .arg(
        arg!(-o --output <FILE> "Path of the generated widget")
        .long_help(
            "Path the SVG widget is written to (defaults to <root>/dist/youtube-music-widget.svg). \
                    The animated background is written next to it as bg.gif.",
        ),
    )
    .arg(
        arg!(-s --source <SOURCE> "Where the configuration is read from")
        .long_help(
            "Configuration source : \"markdown\" reads the comment block of the README, \
                    \"env\" reads YT_MUSIC_THEME, YT_MUSIC_PLAYLIST_ID and YT_MUSIC_ANIMATED_BG.",
        )
        .value_parser(["markdown", "env"])
        .default_value("markdown"),
    )
    .arg(
        arg!(--"no-animation" "Uses the thumbnail as background.")
        .long_help("Skips the animated background and the duration lookup, no external tool is invoked."),
    )
    .arg(
        arg!(--"yt-dlp" <BIN> "Video downloader binary")
        .default_value(DOWNLOADER),
    )
    .arg(
        arg!(--ffmpeg <BIN> "Video transcoder binary")
        .default_value(TRANSCODER),
    )
}
