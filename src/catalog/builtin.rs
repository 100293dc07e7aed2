//! Built-in question catalog for the student services survey.

use crate::models::Question;

const AUDIO: &str = "جودة التسجيلات الصوتية";
const SUMMARIES: &str = "الملخصات العلمية";
const QUESTION_MODELS: &str = "نماذج الأسئلة";
const COMMITTEE: &str = "الأداء العام للجنة العلمية";

const QUESTIONS: &[(u32, &str, &str)] = &[
    (1, AUDIO, "جودة الصوت في التسجيل"),
    (2, AUDIO, "وضوح صوت المحاضر أو المختص"),
    (3, AUDIO, "خلو التسجيل من الضوضاء والمقاطعات"),
    (4, AUDIO, "تغطية التسجيل لجميع أجزاء المحاضرة أو المختص"),
    (5, SUMMARIES, "مدى دقة المعلومات الواردة في الملخصات"),
    (6, SUMMARIES, "سهولة فهم وترتيب المحتوى في الملخصات"),
    (7, SUMMARIES, "توافق الملخصات مع محتوى المنهج والمحاضرات"),
    (8, SUMMARIES, "مناسبة حجم الملخصات وعدم الإطالة أو الاختصار المخل"),
    (9, QUESTION_MODELS, "تنوع نماذج الأسئلة وشمولها للمقرر"),
    (10, QUESTION_MODELS, "وضوح صياغة الأسئلة"),
    (11, QUESTION_MODELS, "فائدة النماذج في الاستعداد للاختبارات"),
    (12, QUESTION_MODELS, "مدى توافق النماذج مع طبيعة أسئلة الاختبارات الفعلية"),
    (13, COMMITTEE, "التزام اللجنة بتوفير المواد والملخصات في الوقت المحدد"),
    (14, COMMITTEE, "استجابة اللجنة لملاحظات واستفسارات الطلاب"),
    (15, COMMITTEE, "التقييم العام لأداء اللجنة العلمية"),
];

/// The 15 questions of the survey, grouped into 4 sections.
pub fn builtin_questions() -> Vec<Question> {
    QUESTIONS
        .iter()
        .map(|(id, section, text)| Question {
            id: *id,
            text: text.to_string(),
            section: section.to_string(),
        })
        .collect()
}
