//! Tag identities for element nodes.
//!
//! Elements either carry a [`KnownTag`], whose canonical name is fixed and
//! lowercase, or keep the source text of their start tag so the name can be
//! recovered with its original spelling.

/// Declares a fieldless enum with a fixed lowercase name per variant.
///
/// Generates `as_str` and `from_name` the same way for every table, so the
/// name mapping is written exactly once.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Returns the canonical name for this value.
            #[inline]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }

            /// Look up a value by its canonical name.
            #[inline]
            pub fn from_name(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use named_enum;

named_enum! {
    /// Element names recognized by the HTML5 tree construction rules,
    /// including the SVG and MathML elements those rules special-case.
    pub enum KnownTag {
        Html => "html",
        Head => "head",
        Title => "title",
        Base => "base",
        Link => "link",
        Meta => "meta",
        Style => "style",
        Script => "script",
        Noscript => "noscript",
        Template => "template",
        Body => "body",
        Article => "article",
        Section => "section",
        Nav => "nav",
        Aside => "aside",
        H1 => "h1",
        H2 => "h2",
        H3 => "h3",
        H4 => "h4",
        H5 => "h5",
        H6 => "h6",
        Hgroup => "hgroup",
        Header => "header",
        Footer => "footer",
        Address => "address",
        P => "p",
        Hr => "hr",
        Pre => "pre",
        Blockquote => "blockquote",
        Ol => "ol",
        Ul => "ul",
        Li => "li",
        Dl => "dl",
        Dt => "dt",
        Dd => "dd",
        Figure => "figure",
        Figcaption => "figcaption",
        Main => "main",
        Div => "div",
        A => "a",
        Em => "em",
        Strong => "strong",
        Small => "small",
        S => "s",
        Cite => "cite",
        Q => "q",
        Dfn => "dfn",
        Abbr => "abbr",
        Data => "data",
        Time => "time",
        Code => "code",
        Var => "var",
        Samp => "samp",
        Kbd => "kbd",
        Sub => "sub",
        Sup => "sup",
        I => "i",
        B => "b",
        U => "u",
        Mark => "mark",
        Ruby => "ruby",
        Rt => "rt",
        Rp => "rp",
        Bdi => "bdi",
        Bdo => "bdo",
        Span => "span",
        Br => "br",
        Wbr => "wbr",
        Ins => "ins",
        Del => "del",
        Image => "image",
        Img => "img",
        Iframe => "iframe",
        Embed => "embed",
        Object => "object",
        Param => "param",
        Video => "video",
        Audio => "audio",
        Source => "source",
        Track => "track",
        Canvas => "canvas",
        Map => "map",
        Area => "area",
        Math => "math",
        Mi => "mi",
        Mo => "mo",
        Mn => "mn",
        Ms => "ms",
        Mtext => "mtext",
        Mglyph => "mglyph",
        Malignmark => "malignmark",
        AnnotationXml => "annotation-xml",
        Svg => "svg",
        Foreignobject => "foreignobject",
        Desc => "desc",
        Table => "table",
        Caption => "caption",
        Colgroup => "colgroup",
        Col => "col",
        Tbody => "tbody",
        Thead => "thead",
        Tfoot => "tfoot",
        Tr => "tr",
        Td => "td",
        Th => "th",
        Form => "form",
        Fieldset => "fieldset",
        Legend => "legend",
        Label => "label",
        Input => "input",
        Button => "button",
        Select => "select",
        Datalist => "datalist",
        Optgroup => "optgroup",
        Option => "option",
        Textarea => "textarea",
        Keygen => "keygen",
        Output => "output",
        Progress => "progress",
        Meter => "meter",
        Details => "details",
        Summary => "summary",
        Menu => "menu",
        Menuitem => "menuitem",
        Applet => "applet",
        Acronym => "acronym",
        Bgsound => "bgsound",
        Dir => "dir",
        Frame => "frame",
        Frameset => "frameset",
        Noframes => "noframes",
        Isindex => "isindex",
        Listing => "listing",
        Xmp => "xmp",
        Nextid => "nextid",
        Noembed => "noembed",
        Plaintext => "plaintext",
        Rb => "rb",
        Strike => "strike",
        Basefont => "basefont",
        Big => "big",
        Blink => "blink",
        Center => "center",
        Font => "font",
        Marquee => "marquee",
        Multicol => "multicol",
        Nobr => "nobr",
        Spacer => "spacer",
        Tt => "tt",
        Rtc => "rtc",
    }
}

impl KnownTag {
    /// Resolve a parser-level local name, ignoring ASCII case.
    ///
    /// html5ever lowercases HTML tag names but restores camel case for some
    /// SVG elements (`foreignObject`), so the lookup folds case first.
    pub fn lookup(local: &str) -> Option<Self> {
        if local.bytes().any(|b| b.is_ascii_uppercase()) {
            Self::from_name(&local.to_ascii_lowercase())
        } else {
            Self::from_name(local)
        }
    }
}

/// Tag identity of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    /// A tag from the [`KnownTag`] table.
    Known(KnownTag),
    /// Any other tag. Holds the source text of the start tag, e.g.
    /// `<My-Widget id=x>`.
    Unknown { original: String },
}

impl TagName {
    /// The name to expose for this tag.
    ///
    /// Known tags use their canonical lowercase name; unknown tags derive the
    /// name from the original source text, preserving its casing.
    pub fn resolve(&self) -> &str {
        match self {
            TagName::Known(tag) => tag.as_str(),
            TagName::Unknown { original } => tag_from_original_text(original),
        }
    }
}

/// Extract the tag name from the source text of a start or end tag.
///
/// Strips the leading `<` (or `</`) and trailing `>`, then cuts at the first
/// whitespace or `/`. Text that is not tag-shaped is returned unchanged.
pub fn tag_from_original_text(text: &str) -> &str {
    let Some(rest) = text
        .strip_prefix("</")
        .or_else(|| text.strip_prefix('<'))
    else {
        return text;
    };
    let rest = rest.strip_suffix('>').unwrap_or(rest);
    let end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(rest.len());
    &rest[..end]
}
