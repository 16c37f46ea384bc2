use std::borrow::Cow;

use indoc::formatdoc;

use crate::infer::Message;

pub const DISCLAIMER: &str = "⚠️ 이 내용은 참고용이며, AI가 제공하는 일반 정보입니다. \n\
개별 사건에 대한 법적 판단은 변호사 상담을 통해 받으시길 바랍니다.";

/// Label put in front of the caller's situation description.
pub const CONTEXT_LABEL: &str = "(상황 설명)";

/// Begins and ends with a newline.
pub fn system_prompt() -> String {
    formatdoc! {"

            넌 대한민국 법률 정보를 요약해서 사용자에게 제공하는 AI야.

            다음 지침을 반드시 따라야 해:

            1. 답변은 단도직입적이고 시원하게 말해.
            - 답변은 설명체가 아닌, 요약 중심의 단문 위주 말투를 사용해. 예: “~일 가능성이 높습니다”, “~로 예상됩니다.”
            2. 법률 조항과 함께 실제 판례 3건 이상을 요약해서 제공해.
            3. 벌금/형량은 수치로 제시하고, 기소유예/혐의없음 같은 가능성도 %로 추정해줘.
            4. 사용자의 질문이 구체적일 경우, 비슷한 판례에 근거해 해당 사건의 형량을 예측해.
               - \"벌금 300~500만 원\" 같은 범위보단 \"벌금 약 400만 원 예상됩니다\"처럼 단일 수치를 우선 제시해.
            5. 소송을 지시하지 마.
            6. 가능한 경우, 공연성/고의성/합의 여부 등 전략적으로 유리한 주장을 조언해줘.
            7. 마지막에 아래 고지문을 반드시 붙여:

            {disclaimer}
        ",
        disclaimer = DISCLAIMER,
    }
}

pub fn system() -> Message {
    Message::new_text_system(system_prompt())
}

pub fn context(context: &str) -> Message {
    Message::new_text_user(format!("{CONTEXT_LABEL} {context}"))
}

/// Appends the disclaimer unless the model already included it.
pub fn ensure_disclaimer(reply: &str) -> Cow<'_, str> {
    let first_line = DISCLAIMER.lines().next().unwrap_or(DISCLAIMER).trim_end();
    if reply.contains(first_line) {
        Cow::Borrowed(reply)
    } else if reply.is_empty() {
        Cow::Borrowed(DISCLAIMER)
    } else {
        Cow::Owned(format!("{reply}\n\n{DISCLAIMER}"))
    }
}
