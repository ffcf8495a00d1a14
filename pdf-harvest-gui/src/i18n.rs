//! Form labels in English and Arabic

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Arabic];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Text direction for the `dir` attribute
    pub fn direction(self) -> &'static str {
        match self {
            Language::English => "ltr",
            Language::Arabic => "rtl",
        }
    }

    /// The language's own name, as shown in the language menu
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => Language::English.label(Label::LangEnglish),
            Language::Arabic => Language::Arabic.label(Label::LangArabic),
        }
    }

    pub fn label(self, label: Label) -> &'static str {
        match self {
            Language::English => english(label),
            Language::Arabic => arabic(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Title,
    SelectPdf,
    Browse,
    SelectOutput,
    Start,
    Success,
    Images,
    Texts,
    Saved,
    Developed,
    Error,
    InvalidPath,
    OpenFolder,
    MenuLanguage,
    LangEnglish,
    LangArabic,
    Busy,
    Extracting,
    Ok,
    Select,
    UseFolder,
    ParentFolder,
    Cancel,
}

fn english(label: Label) -> &'static str {
    match label {
        Label::Title => "PDF Extractor",
        Label::SelectPdf => "📄 PDF File Path:",
        Label::Browse => "Browse",
        Label::SelectOutput => "📁 Output Folder (optional):",
        Label::Start => "🚀 Start Extraction",
        Label::Success => "✅ Extraction completed!",
        Label::Images => "📸 Images extracted",
        Label::Texts => "📝 Text pages extracted",
        Label::Saved => "📁 Saved in",
        Label::Developed => "Built with pdf-harvest",
        Label::Error => "Error",
        Label::InvalidPath => "PDF file path is invalid.",
        Label::OpenFolder => "📂 Open Folder",
        Label::MenuLanguage => "Language",
        Label::LangEnglish => "English",
        Label::LangArabic => "Arabic",
        Label::Busy => "An extraction is already running.",
        Label::Extracting => "Extracting...",
        Label::Ok => "OK",
        Label::Select => "Select",
        Label::UseFolder => "Use this folder",
        Label::ParentFolder => "Up",
        Label::Cancel => "Cancel",
    }
}

fn arabic(label: Label) -> &'static str {
    match label {
        Label::Title => "أداة استخراج PDF",
        Label::SelectPdf => "📄 مسار ملف PDF:",
        Label::Browse => "استعراض",
        Label::SelectOutput => "📁 مجلد الإخراج (اختياري):",
        Label::Start => "🚀 بدء الاستخراج",
        Label::Success => "✅ تم الاستخراج بنجاح!",
        Label::Images => "📸 عدد الصور المستخرجة",
        Label::Texts => "📝 عدد الصفحات النصية",
        Label::Saved => "📁 تم الحفظ في",
        Label::Developed => "تم البناء باستخدام pdf-harvest",
        Label::Error => "خطأ",
        Label::InvalidPath => "مسار ملف PDF غير صالح.",
        Label::OpenFolder => "📂 فتح المجلد",
        Label::MenuLanguage => "اللغة",
        Label::LangEnglish => "الإنجليزية",
        Label::LangArabic => "العربية",
        Label::Busy => "عملية استخراج قيد التنفيذ بالفعل.",
        Label::Extracting => "جارٍ الاستخراج...",
        Label::Ok => "موافق",
        Label::Select => "اختيار",
        Label::UseFolder => "استخدام هذا المجلد",
        Label::ParentFolder => "للأعلى",
        Label::Cancel => "إلغاء",
    }
}
